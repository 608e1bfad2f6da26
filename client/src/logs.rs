//! Colorized console logging for ledger submissions and settlement progress.

use std::fmt::Display;

use colored::{
    Color,
    Colorize,
};

#[derive(strum_macros::Display)]
#[strum(serialize_all = "UPPERCASE")]
enum Level {
    Info,
    Success,
    Warning,
    Error,
}

impl Level {
    fn color(&self) -> LogColor {
        match self {
            Self::Info => LogColor::Info,
            Self::Success => LogColor::Highlight,
            Self::Warning => LogColor::Warning,
            Self::Error => LogColor::Error,
        }
    }
}

fn log(level: Level, label: impl Display, msg: impl Display) {
    let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);
    println!(
        "{} [{}] {} {}",
        timestamp.color(LogColor::FadedGray),
        level.to_string().color(level.color()),
        label.to_string().color(LogColor::Label),
        msg.to_string().bright_black()
    );
}

#[derive(Clone, Copy, Debug)]
pub enum LogColor {
    Highlight,
    Label,
    Error,
    Warning,
    Info,
    Gray,
    FadedGray,
}

#[rustfmt::skip]
mod unformatted {
    use super::*;

    pub fn log_info(label: impl Display, msg: impl Display) { log(Level::Info, label, msg) }
    pub fn log_success(label: impl Display, msg: impl Display) { log(Level::Success, label, msg) }
    pub fn log_warning(label: impl Display, msg: impl Display) { log(Level::Warning, label, msg) }
    pub fn log_error(label: impl Display, msg: impl Display) { log(Level::Error, label, msg) }

    impl From<LogColor> for Color {
        fn from(value: LogColor) -> Color {
            match value {
                LogColor::Highlight  => Color::TrueColor { r: 255, g: 215, b: 87  },
                LogColor::Label      => Color::TrueColor { r: 40,  g: 100, b: 153 },
                LogColor::Error      => Color::TrueColor { r: 255, g: 0,   b: 45  },
                LogColor::Warning    => Color::TrueColor { r: 180, g: 105, b: 0   },
                LogColor::Info       => Color::TrueColor { r: 0,   g: 95,  b: 255 },
                LogColor::Gray       => Color::TrueColor { r: 192, g: 192, b: 192 },
                LogColor::FadedGray  => Color::TrueColor { r: 95,  g: 95,  b: 95  },
            }
        }
    }
}

pub use unformatted::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_render_uppercase_with_their_color() {
        assert_eq!(Level::Warning.to_string(), "WARNING");
        assert_eq!(Level::Success.to_string(), "SUCCESS");
        assert!(matches!(Level::Warning.color(), LogColor::Warning));
        assert!(matches!(Level::Error.color(), LogColor::Error));
    }
}
