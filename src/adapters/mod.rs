//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter        | Implements   | Connects to                   |
//! |----------------|--------------|-------------------------------|
//! | `alert`        | AlertPort    | Log output (mailer stand-in)  |
//! | `buzzer`       | SoundPort    | `embedded-hal` GPIO + delay   |
//! | `config_file`  | ConfigPort   | JSON file on disk             |
//! | `console`      | DisplayPort  | Terminal stdout               |
//! | `log_sink`     | EventSink    | Log output                    |
//! | `sound`        | SoundPort    | Log output, timed playback    |

pub mod alert;
pub mod buzzer;
pub mod config_file;
pub mod console;
pub mod log_sink;
pub mod sound;
