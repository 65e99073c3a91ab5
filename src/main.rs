use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::{json, Value};

use intentflow::config::EngineConfig;
use intentflow::logging::init_tracing;
use intentflow::{
    connect, ActionOutcome, Connected, EngineError, HistoryControls, Host, Intent, IntentSender,
    Mounted, Props, Transition, View,
};

#[derive(Parser)]
#[command(name = "intentflow", version, about = "Intent-driven state with undo/redo history")]
struct Cli {
    /// Config file (default: ~/.config/intentflow/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log filter, overrides the config file (RUST_LOG still wins)
    #[arg(long, global = true)]
    log: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Drive the counter demo and print every rendered frame as JSON
    Counter {
        /// Initial count supplied as an external prop
        #[arg(long, default_value_t = 0)]
        count: i64,

        /// Enable backward/forward controls
        #[arg(long)]
        history: bool,

        /// Extra external props as a JSON object, passed through to the view
        #[arg(long, value_parser = parse_props)]
        props: Option<Props>,

        /// inc, dec, inc-async, backward, forward, set-count=N
        steps: Vec<Step>,
    },
}

fn parse_props(raw: &str) -> Result<Props, String> {
    let value: Value = serde_json::from_str(raw).map_err(|e| e.to_string())?;
    Props::from_value(value).map_err(|e| e.to_string())
}

#[derive(Debug, Clone, Copy)]
enum Step {
    Inc,
    Dec,
    IncAsync,
    Backward,
    Forward,
    SetCount(i64),
}

impl FromStr for Step {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "inc" => Ok(Step::Inc),
            "dec" => Ok(Step::Dec),
            "inc-async" => Ok(Step::IncAsync),
            "backward" => Ok(Step::Backward),
            "forward" => Ok(Step::Forward),
            other => match other.strip_prefix("set-count=") {
                Some(n) => n
                    .parse()
                    .map(Step::SetCount)
                    .map_err(|e| format!("invalid count '{}': {}", n, e)),
                None => Err(format!("unknown step '{}'", other)),
            },
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Inc => write!(f, "inc"),
            Step::Dec => write!(f, "dec"),
            Step::IncAsync => write!(f, "inc-async"),
            Step::Backward => write!(f, "backward"),
            Step::Forward => write!(f, "forward"),
            Step::SetCount(n) => write!(f, "set-count={}", n),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
struct Frame {
    props: Props,
    controls: bool,
}

struct CounterView;

impl View for CounterView {
    type Output = Frame;

    fn default_props(&self) -> Props {
        Props::new().with("count", 0)
    }

    fn render(&self, props: &Props, history: Option<&HistoryControls>) -> Frame {
        Frame {
            props: props.clone(),
            controls: history.is_some(),
        }
    }
}

fn count_of(props: &Props) -> i64 {
    props.get_i64("count").unwrap_or(0)
}

fn counter() -> Connected<CounterView> {
    connect(|intent: &Intent, intents: &IntentSender| match intent.kind() {
        "inc" => Transition::new(|s| Props::new().with("count", count_of(s) + 1)),
        "dec" => {
            intents.send(Intent::new("dec triggered"));
            Transition::new(|s| Props::new().with("count", count_of(s) - 1))
        }
        _ => Transition::identity(),
    })
    .action("inc", |_| Intent::new("inc"))
    .action("dec", |_| Intent::new("dec"))
    .bind(CounterView)
}

fn print_frame(label: &str, instance: &Mounted<CounterView>) -> Result<()> {
    let history = instance.history_state();
    let line = json!({
        "step": label,
        "cursor": history.cursor(),
        "entries": history.len(),
        "renders": instance.render_count(),
        "frame": instance.rendered(),
    });
    println!("{}", serde_json::to_string(&line)?);
    Ok(())
}

/// Log a refused engine call with its error tag before it aborts the run.
fn engine_failure(err: EngineError) -> anyhow::Error {
    tracing::error!(error_type = err.error_type(), error = %err, "Engine call failed");
    err.into()
}

async fn run_counter(
    host: Host,
    base: Props,
    count: i64,
    history: bool,
    steps: Vec<Step>,
) -> Result<()> {
    let external = |n: i64| base.clone().with("count", n).with("history", history);
    let instance = host.mount(&counter(), external(count));
    print_frame("mount", &instance)?;

    for step in steps {
        match step {
            Step::Inc => instance
                .actions()
                .call("inc", Value::Null)
                .map_err(engine_failure)?,
            Step::Dec => instance
                .actions()
                .call("dec", Value::Null)
                .map_err(engine_failure)?,
            Step::IncAsync => {
                let pending = instance
                    .actions()
                    .from_future(async { Intent::new("inc") })
                    .map_err(engine_failure)?;
                if pending.wait().await != ActionOutcome::Delivered {
                    bail!("async increment was not delivered");
                }
            }
            Step::Backward | Step::Forward => {
                let Some(controls) = instance.history_controls() else {
                    bail!("'{}' needs --history", step);
                };
                if matches!(step, Step::Backward) {
                    controls.backward();
                } else {
                    controls.forward();
                }
            }
            Step::SetCount(n) => instance.set_props(external(n)),
        }
        print_frame(&step.to_string(), &instance)?;
    }

    instance.unmount();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let path = cli.config.unwrap_or_else(EngineConfig::config_path);
    let host = Host::open(path.clone())
        .with_context(|| format!("loading config from {}", path.display()))?;

    let mut logging = host.config().get().logging;
    if let Some(filter) = cli.log {
        logging.filter = filter;
    }
    init_tracing(&logging);

    match cli.command {
        Command::Counter {
            count,
            history,
            props,
            steps,
        } => run_counter(host, props.unwrap_or_default(), count, history, steps).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_steps() {
        assert!(matches!("inc".parse::<Step>(), Ok(Step::Inc)));
        assert!(matches!("set-count=7".parse::<Step>(), Ok(Step::SetCount(7))));
        assert!("set-count=x".parse::<Step>().is_err());
        assert!("jump".parse::<Step>().is_err());
    }

    #[test]
    fn step_display_round_trips() {
        for step in ["inc", "dec", "inc-async", "backward", "forward", "set-count=-3"] {
            assert_eq!(step.parse::<Step>().unwrap().to_string(), step);
        }
    }

    #[test]
    fn props_flag_accepts_only_objects() {
        let props = parse_props(r#"{"label": "clicks"}"#).unwrap();
        assert_eq!(props.get_str("label"), Some("clicks"));
        assert!(parse_props("[1, 2]").unwrap_err().contains("Invalid props"));
        assert!(parse_props("{not json").is_err());
    }

    #[test]
    fn engine_failure_keeps_message() {
        let err = engine_failure(EngineError::NoRuntime);
        assert!(err.to_string().contains("tokio runtime"));
    }

    #[test]
    fn counter_dec_emits_followup() {
        let host = Host::default();
        let instance = host.mount(&counter(), Props::new());
        instance.actions().call("dec", Value::Null).unwrap();
        // dec + the identity step for "dec triggered"
        assert_eq!(instance.history_state().len(), 2);
        assert_eq!(instance.current().get_i64("count"), Some(-1));
    }
}
