//! Calendar executors.

use anyhow::Result;
use async_trait::async_trait;
use serde_json::{json, Value};

use super::{Args, ToolExecutor};
use crate::backend::{Backend, EventFilter};

pub struct ListCalendarEvents;

#[async_trait]
impl ToolExecutor for ListCalendarEvents {
    fn tool_name(&self) -> &'static str {
        "list_calendar_events"
    }

    async fn execute(&self, backend: &dyn Backend, args: Value) -> Result<Value> {
        let filter = EventFilter {
            time_min: args.datetime_arg("time_min")?,
            time_max: args.datetime_arg("time_max")?,
            calendar_id: args.str_arg("calendar_id").map(str::to_string),
            limit: Some(args.usize_arg_or("limit", 50)),
            offset: Some(args.usize_arg_or("offset", 0)),
        };
        let events = backend.list_calendar_events(filter).await?;
        Ok(json!({
            "events": events,
            "count": events.len(),
            "message": format!("Found {} event(s)", events.len()),
        }))
    }
}
