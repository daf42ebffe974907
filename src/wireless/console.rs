// Operator interaction: status output, warnings and prompted input
use std::io::{self, Write};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

#[allow(async_fn_in_trait)]
pub trait Console {
    /// Next line of operator input; `None` on end-of-input.
    async fn read_line(&mut self) -> io::Result<Option<String>>;

    /// Prompt text without a trailing newline.
    fn prompt(&mut self, text: &str);

    fn status(&mut self, line: &str);

    fn warn(&mut self, line: &str);
}

/// Terminal console: stdout for status, stderr for warnings.
pub struct StdConsole {
    input: Lines<BufReader<Stdin>>,
}

impl Default for StdConsole {
    fn default() -> Self {
        Self::new()
    }
}

impl StdConsole {
    pub fn new() -> Self {
        Self {
            input: BufReader::new(tokio::io::stdin()).lines(),
        }
    }
}

impl Console for StdConsole {
    async fn read_line(&mut self) -> io::Result<Option<String>> {
        self.input.next_line().await
    }

    fn prompt(&mut self, text: &str) {
        let mut stdout = io::stdout().lock();
        let _ = write!(stdout, "{text}");
        let _ = stdout.flush();
    }

    fn status(&mut self, line: &str) {
        println!("{line}");
    }

    fn warn(&mut self, line: &str) {
        eprintln!("⚠️ {line}");
    }
}
