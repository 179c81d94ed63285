//! Common test utilities
//!
//! Sample pages shaped like the timetable generator's output and a scripted
//! transport for driving the connection manager without sockets.

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use kitis::crawler::{Identity, RawResponse, Transport, TransportError};

/// Group index page listing two groups
pub const GROUP_INDEX_HTML: &str = r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"><title>Группы</title></head>
<body>
<h1>Расписание групп</h1>
<table class="inf">
    <tr><td class="hd">№</td><td class="hd">Группа</td></tr>
    <tr><td class="ur">1</td><td class="ur"><a class="z0" href="cg61.htm">ИСс24-1</a></td></tr>
    <tr><td class="ur">2</td><td class="ur"><a class="z0" href="cg62.htm">ИСс24-2</a></td></tr>
    <tr><td colspan="2"><a href="index.htm">На главную</a></td></tr>
</table>
</body>
</html>"#;

/// Lecturer index page
pub const LECTURER_INDEX_HTML: &str = r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"></head>
<body>
<table class="inf">
    <tr><td class="hd">№</td><td class="hd">Преподаватель</td></tr>
    <tr><td class="ur">1</td><td class="ur"><a class="z0" href="cp12.htm">Иванова И.И.</a></td></tr>
</table>
</body>
</html>"#;

/// Room index page
pub const ROOM_INDEX_HTML: &str = r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"></head>
<body>
<table class="inf">
    <tr><td class="hd">№</td><td class="hd">Аудитория</td></tr>
    <tr><td class="ur">1</td><td class="ur"><a class="z0" href="ca214.htm">214</a></td></tr>
</table>
</body>
</html>"#;

/// Three days of a group timetable
///
/// Monday: whole-class lesson 1, split lesson 2, lesson 3 without a room.
/// Tuesday: lesson 1 for the first subgroup only, whole-class lesson 2,
/// free lesson 3. Wednesday: one free period, so no lessons at all.
pub const GROUP_SCHEDULE_HTML: &str = r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"><title>ИСс24-1</title></head>
<body>
<h1>Группа: ИСс24-1</h1>
<div class="ref">Обновлено: 29.08.2025 в 14:05</div>
<table class="inf">
    <tr><td class="hd" rowspan="2">Дата</td><td class="hd" rowspan="2">Пара</td><td class="hd" colspan="2">Занятия</td></tr>
    <tr><td class="hd">1 подгруппа</td><td class="hd">2 подгруппа</td></tr>

    <tr>
        <td class="hd" rowspan="3">01.09.2025<br>Пн</td>
        <td class="hd">1</td>
        <td class="ur" colspan="2"><a class="z1" href="x">Разговоры о важном</a> <a class="z2" href="x">214</a> <a class="z3" href="x">Иванова И.И.</a></td>
    </tr>
    <tr>
        <td class="hd">2</td>
        <td class="ur"><a class="z1" href="x">Математика</a> <a class="z2" href="x">301</a> <a class="z3" href="x">Петров П.П.</a></td>
        <td class="ur"><a class="z1" href="x">Информатика</a> <a class="z2" href="x">305</a> <a class="z3" href="x">Сидоров С.С.</a></td>
    </tr>
    <tr>
        <td class="hd">3</td>
        <td class="ur" colspan="2"><a class="z1" href="x">Физкультура</a> <a class="z3" href="x">Козлов К.К.</a></td>
    </tr>
    <tr><td class="hd0" colspan="4"></td></tr>

    <tr>
        <td class="hd" rowspan="3">02.09.2025<br>Вт</td>
        <td class="hd">1</td>
        <td class="ur"><a class="z1" href="x">Английский язык</a> <a class="z2" href="x">410</a> <a class="z3" href="x">Смирнова А.А.</a></td>
        <td class="ur">&nbsp;</td>
    </tr>
    <tr>
        <td class="hd">2</td>
        <td class="ur" colspan="2"><a class="z1" href="x">История</a> <a class="z2" href="x">103</a> <a class="z3" href="x">Орлова О.О.</a></td>
    </tr>
    <tr>
        <td class="hd">3</td>
        <td class="ur" colspan="2">&nbsp;</td>
    </tr>
    <tr><td class="hd0" colspan="4"></td></tr>

    <tr>
        <td class="hd">03.09.2025<br>Ср</td>
        <td class="hd">1</td>
        <td class="ur" colspan="2">&nbsp;</td>
    </tr>
</table>
</body>
</html>"#;

/// Schedule page whose table lists a lesson number the bell tables lack
pub const UNKNOWN_LESSON_HTML: &str = r#"<html><body>
<h1>Группа: ИСс24-2</h1>
<div class="ref">Обновлено: 29.08.2025 в 14:05</div>
<table class="inf">
    <tr><td class="hd">Дата</td><td class="hd">Пара</td><td class="hd">Занятия</td></tr>
    <tr><td class="hd">1 подгруппа</td><td class="hd">2 подгруппа</td></tr>
    <tr><td class="hd">04.09.2025 Чт</td><td class="hd">8</td><td class="ur"><a class="z1">Практика</a></td></tr>
</table>
</body></html>"#;

/// Successful response with an HTML body
pub fn ok(body: &str) -> RawResponse {
    status_with_body(200, body)
}

/// Response with the given status and an empty body
pub fn status(code: u16) -> RawResponse {
    status_with_body(code, "")
}

pub fn status_with_body(code: u16, body: &str) -> RawResponse {
    RawResponse {
        status: code,
        content_type: Some("text/html; charset=utf-8".to_string()),
        body: body.as_bytes().to_vec(),
        elapsed: Duration::from_millis(42),
    }
}

/// Transport that replays a script, then serves fixed pages
///
/// Scripted results are consumed first, in order. Once the script is empty,
/// requests are answered from `pages` by exact URL, or with 404.
#[derive(Default)]
pub struct ScriptedTransport {
    script: Mutex<VecDeque<Result<RawResponse, TransportError>>>,
    pages: HashMap<String, RawResponse>,
    calls: Mutex<Vec<(String, u64)>>,
}

impl ScriptedTransport {
    pub fn new(script: Vec<Result<RawResponse, TransportError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            ..Default::default()
        }
    }

    /// Serve `body` with status 200 at `url`
    pub fn with_page(mut self, url: &str, body: &str) -> Self {
        self.pages.insert(url.to_string(), ok(body));
        self
    }

    /// Serve an arbitrary response at `url`
    pub fn with_response(mut self, url: &str, response: RawResponse) -> Self {
        self.pages.insert(url.to_string(), response);
        self
    }

    /// Every request seen so far, with the identity generation it used
    pub fn calls(&self) -> Vec<(String, u64)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn get(&self, url: &str, identity: &Identity) -> Result<RawResponse, TransportError> {
        self.calls
            .lock()
            .unwrap()
            .push((url.to_string(), identity.generation()));

        if let Some(next) = self.script.lock().unwrap().pop_front() {
            return next;
        }

        Ok(self.pages.get(url).cloned().unwrap_or_else(|| status(404)))
    }
}
