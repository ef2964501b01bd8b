use anyhow::Result;
use crossterm::{
    style::{self, Colorize, StyledContent, Styler},
    QueueableCommand,
};
use number_prefix::NumberPrefix;
use std::{
    fmt::Display,
    io::{self, Write},
};

/// Operator facing transcript of a run.
pub struct Console {
    out: Box<dyn Write>,
}

impl Console {
    pub fn stdout() -> Console {
        Console {
            out: Box::new(io::stdout()),
        }
    }

    #[cfg(test)]
    pub fn sink() -> Console {
        Console {
            out: Box::new(io::sink()),
        }
    }

    pub fn info<M: Display>(&mut self, message: M) -> Result<()> {
        self.print("INFO: ".cyan().bold(), message)
    }

    pub fn done<M: Display>(&mut self, message: M) -> Result<()> {
        self.print("DONE: ".green().bold(), message)
    }

    pub fn error<M: Display>(&mut self, message: M) -> Result<()> {
        self.print("ERROR: ".red().bold(), message)
    }

    fn print<M: Display>(&mut self, label: StyledContent<&'static str>, message: M) -> Result<()> {
        self.out
            .queue(style::PrintStyledContent(label))?
            .queue(style::Print(format!("{}\n", message)))?
            .flush()?;

        Ok(())
    }
}

pub fn format_size(bytes: u64) -> String {
    match NumberPrefix::binary(bytes as f32) {
        NumberPrefix::Standalone(bytes) => format!("{} bytes", bytes),
        NumberPrefix::Prefixed(prefix, n) => format!("{:.1} {}B", n, prefix),
    }
}
