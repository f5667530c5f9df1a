//! Host/worker message protocol
//!
//! ```text
//! Host → Worker   {"command":"start","config":{..},"iterations":1000000}
//!                 {"command":"stop"}
//! Worker → Host   {"event":"progress","spinsDone":..,"fractionComplete":..,"currentRtp":..}
//!                 {"event":"result","rtpPercent":..,"hitFrequencyPercent":..,"maxWin":..,
//!                  "totalCost":..,"totalWon":..}
//!                 {"event":"error","message":".."}
//! ```

use fm_slot::MachineConfig;
use serde::{Deserialize, Serialize};

use crate::accumulator::StatisticsResult;
use crate::error::StatsResult;
use crate::run::Progress;

/// Host → worker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "camelCase")]
pub enum HostCommand {
    Start {
        config: Box<MachineConfig>,
        iterations: u64,
    },
    Stop,
}

impl HostCommand {
    /// Parse a command from JSON
    pub fn from_json(json: &str) -> StatsResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn start(config: MachineConfig, iterations: u64) -> Self {
        Self::Start {
            config: Box::new(config),
            iterations,
        }
    }
}

/// Worker → host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum DriverEvent {
    Progress(Progress),
    Result(StatisticsResult),
    Error { message: String },
}

impl DriverEvent {
    /// Serialize for the host
    pub fn to_json(&self) -> StatsResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// True for events that end a run
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Progress(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fm_slot::presets;
    use serde_json::{Value, json};

    #[test]
    fn test_stop_command() {
        assert_eq!(
            HostCommand::from_json(r#"{"command":"stop"}"#).unwrap(),
            HostCommand::Stop
        );
    }

    #[test]
    fn test_start_command() {
        let config = presets::classic_3x3().config;
        let json = json!({
            "command": "start",
            "config": serde_json::to_value(&config).unwrap(),
            "iterations": 250000,
        });
        let command = HostCommand::from_json(&json.to_string()).unwrap();
        assert_eq!(command, HostCommand::start(config, 250_000));
    }

    #[test]
    fn test_unknown_command_rejected() {
        assert!(HostCommand::from_json(r#"{"command":"pause"}"#).is_err());
        assert!(HostCommand::from_json(r#"{"command":"start"}"#).is_err());
    }

    #[test]
    fn test_progress_event_shape() {
        let event = DriverEvent::Progress(Progress {
            spins_done: 10_000,
            fraction_complete: 0.5,
            current_rtp: 96.5,
        });
        let value: Value = serde_json::from_str(&event.to_json().unwrap()).unwrap();
        assert_eq!(
            value,
            json!({
                "event": "progress",
                "spinsDone": 10000,
                "fractionComplete": 0.5,
                "currentRtp": 96.5,
            })
        );
        assert!(!event.is_terminal());
    }

    #[test]
    fn test_result_event_shape() {
        let event = DriverEvent::Result(StatisticsResult {
            rtp_percent: 95.0,
            hit_frequency_percent: 30.0,
            max_win: 2000,
            total_cost: 100,
            total_won: 95,
        });
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["event"], "result");
        assert_eq!(value["rtpPercent"], 95.0);
        assert_eq!(value["hitFrequencyPercent"], 30.0);
        assert_eq!(value["maxWin"], 2000);
        assert_eq!(value["totalCost"], 100);
        assert_eq!(value["totalWon"], 95);
        assert!(event.is_terminal());
    }

    #[test]
    fn test_error_event_shape() {
        let event = DriverEvent::Error {
            message: "entropy".into(),
        };
        assert_eq!(
            serde_json::to_value(&event).unwrap(),
            json!({"event": "error", "message": "entropy"})
        );
    }
}
