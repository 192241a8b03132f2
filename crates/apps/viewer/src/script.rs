//! Recorded host events, one JSON object per line.
//!
//! ```text
//! {"type":"down","x":412,"y":300,"t_ms":0}
//! {"type":"up","x":414,"y":301,"t_ms":120}
//! {"type":"resize","width":1024,"height":768}
//! {"type":"tick","dt_ms":16.7}
//! ```
//!
//! Blank lines and lines starting with `#` are ignored.

use foundation::math::Vec2;
use foundation::time::Time;
use runtime::PointerSample;
use scene::selection::{SelectionObserver, Transition};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::context::AppContext;

fn primary_pointer() -> i32 {
    1
}

fn yes() -> bool {
    true
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointerInput {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub t_ms: f64,
    #[serde(default = "primary_pointer")]
    pub id: i32,
    #[serde(default = "yes")]
    pub primary: bool,
}

impl PointerInput {
    pub fn sample(&self) -> PointerSample {
        PointerSample {
            position: Vec2::new(self.x, self.y),
            time: Time::from_millis(self.t_ms),
            pointer_id: self.id,
            is_primary: self.primary,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScriptEvent {
    Down(PointerInput),
    Move(PointerInput),
    Up(PointerInput),
    Cancel,
    Wheel { delta: f64 },
    Resize { width: f64, height: f64 },
    Tick { dt_ms: f64 },
}

#[derive(Debug, Error)]
#[error("event script line {line}: {error}")]
pub struct ScriptError {
    pub line: usize,
    #[source]
    pub error: serde_json::Error,
}

pub fn parse_script(text: &str) -> Result<Vec<ScriptEvent>, ScriptError> {
    text.lines()
        .enumerate()
        .filter(|(_, l)| {
            let l = l.trim();
            !l.is_empty() && !l.starts_with('#')
        })
        .map(|(i, l)| {
            serde_json::from_str(l).map_err(|error| ScriptError { line: i + 1, error })
        })
        .collect()
}

impl ScriptEvent {
    /// Feeds the event to `ctx`. Returns the selection transition, if the
    /// event completed a tap.
    pub fn apply(
        &self,
        ctx: &mut AppContext,
        observer: &mut impl SelectionObserver,
    ) -> Option<Transition> {
        match self {
            ScriptEvent::Down(p) => ctx.pointer_down(p.sample()),
            ScriptEvent::Move(p) => ctx.pointer_move(p.sample()),
            ScriptEvent::Up(p) => return ctx.pointer_up(p.sample(), observer),
            ScriptEvent::Cancel => ctx.pointer_cancel(),
            ScriptEvent::Wheel { delta } => ctx.wheel(*delta),
            ScriptEvent::Resize { width, height } => ctx.resize(*width, *height),
            ScriptEvent::Tick { dt_ms } => {
                ctx.tick(dt_ms / 1000.0);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::{PointerInput, ScriptEvent, parse_script};

    #[test]
    fn parses_events_and_skips_comments() {
        let text = r#"
# tap near the middle
{"type":"down","x":400,"y":300,"t_ms":0}
{"type":"up","x":402,"y":301,"t_ms":90}

{"type":"move","x":1,"y":2,"id":2,"primary":false}
{"type":"cancel"}
{"type":"wheel","delta":-120}
{"type":"resize","width":1024,"height":768}
{"type":"tick","dt_ms":16}
"#;
        let events = parse_script(text).expect("parse");
        assert_eq!(events.len(), 7);
        assert_eq!(
            events[0],
            ScriptEvent::Down(PointerInput {
                x: 400.0,
                y: 300.0,
                t_ms: 0.0,
                id: 1,
                primary: true
            })
        );
        match events[2] {
            ScriptEvent::Move(p) => {
                assert_eq!(p.id, 2);
                assert!(!p.primary);
                assert_eq!(p.t_ms, 0.0);
            }
            other => panic!("unexpected event: {other:?}"),
        }
        assert_eq!(
            events[5],
            ScriptEvent::Resize {
                width: 1024.0,
                height: 768.0
            }
        );
    }

    #[test]
    fn reports_the_failing_line() {
        let err = parse_script("{\"type\":\"cancel\"}\n{\"type\":\"jump\"}").expect_err("bad");
        assert_eq!(err.line, 2);
    }
}
