//! Shared counter fixture.

#![allow(dead_code)]

use intentflow::{
    connect, Connected, HistoryControls, Intent, IntentSender, Props, Transition, View,
};
use serde_json::Value;

/// Text content of each rendered element, plus the history triggers.
#[derive(Debug, Clone)]
pub struct CounterOutput {
    pub count: String,
    pub wrapper_props: String,
    pub overwrited_props: String,
    pub controls: Option<HistoryControls>,
}

pub struct CounterView;

fn text(props: &Props, key: &str) -> String {
    match props.get(key) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

impl View for CounterView {
    type Output = CounterOutput;

    fn default_props(&self) -> Props {
        Props::new().with("count", 0).with("overwritedProps", "inner")
    }

    fn render(&self, props: &Props, history: Option<&HistoryControls>) -> CounterOutput {
        CounterOutput {
            count: text(props, "count"),
            wrapper_props: text(props, "wrapperProps"),
            overwrited_props: text(props, "overwritedProps"),
            controls: history.cloned(),
        }
    }
}

fn count_of(props: &Props) -> i64 {
    props.get_i64("count").unwrap_or(0)
}

pub fn counter() -> Connected<CounterView> {
    connect(|intent: &Intent, intents: &IntentSender| match intent.kind() {
        "inc" => Transition::new(|s| Props::new().with("count", count_of(s) + 1)),
        "dec" => {
            intents.send(Intent::new("dec triggered"));
            Transition::new(|s| Props::new().with("count", count_of(s) - 1))
        }
        "changeWrapperProps" => {
            let value = intent.value().clone();
            Transition::new(move |_| {
                Props::new()
                    .with("wrapperProps", value.clone())
                    .with("overwritedProps", value.clone())
            })
        }
        "changeDefaultProps" => {
            let value = intent.value().clone();
            Transition::new(move |_| Props::new().with("count", value.clone()))
        }
        _ => Transition::identity(),
    })
    .action("inc", |_| Intent::new("inc"))
    .action("dec", |_| Intent::new("dec"))
    .action("changeWrapperProps", |value| {
        Intent::with_value("changeWrapperProps", value)
    })
    .action("changeDefaultProps", |value| {
        Intent::with_value("changeDefaultProps", value)
    })
    .bind(CounterView)
}

pub fn with_history() -> Props {
    Props::new().with("history", true)
}
