use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Stdin, Stdout};
use tokio::sync::Mutex;

/// One entry of a pick list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceItem {
    pub label: String,
    pub description: String,
}

/// User input supplied by the host.
///
/// `None` means the user dismissed the prompt. Calls wait for as long as the
/// user takes; there's no timeout.
#[async_trait::async_trait]
pub trait PromptService: Send + Sync {
    async fn prompt_text(&self, label: &str, placeholder: &str) -> Option<String>;

    /// Index of the picked option
    async fn prompt_choice(&self, options: &[ChoiceItem]) -> Option<usize>;

    /// Fire-and-forget message
    fn notify_info(&self, message: &str);
}

/// Prompts on the controlling terminal. End of input counts as dismissal.
pub struct TerminalPrompt {
    input: Mutex<BufReader<Stdin>>,
    output: Mutex<Stdout>,
}

impl TerminalPrompt {
    pub fn new() -> Self {
        Self {
            input: Mutex::new(BufReader::new(tokio::io::stdin())),
            output: Mutex::new(tokio::io::stdout()),
        }
    }

    async fn write(&self, text: &str) {
        let mut output = self.output.lock().await;
        if let Err(e) = output.write_all(text.as_bytes()).await {
            log::warn!("Failed to write prompt: {}", e);
            return;
        }
        let _ = output.flush().await;
    }

    async fn read_line(&self) -> Option<String> {
        let mut input = self.input.lock().await;
        let mut line = String::new();
        match input.read_line(&mut line).await {
            Ok(0) => None,
            Ok(_) => Some(line.trim_end_matches(['\r', '\n']).to_string()),
            Err(e) => {
                log::warn!("Failed to read answer: {}", e);
                None
            }
        }
    }
}

impl Default for TerminalPrompt {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl PromptService for TerminalPrompt {
    async fn prompt_text(&self, label: &str, placeholder: &str) -> Option<String> {
        self.write(&format!("{} ({}): ", label, placeholder)).await;
        self.read_line().await
    }

    async fn prompt_choice(&self, options: &[ChoiceItem]) -> Option<usize> {
        let mut menu = String::new();
        for (index, option) in options.iter().enumerate() {
            menu.push_str(&format!("  {}) {}  {}\n", index + 1, option.label, option.description));
        }
        menu.push_str("Select: ");
        self.write(&menu).await;

        let answer = self.read_line().await?;
        parse_choice(&answer, options.len())
    }

    fn notify_info(&self, message: &str) {
        println!("{}", message);
    }
}

/// 1-based menu answer to an index, `None` for blank or out-of-range input
fn parse_choice(answer: &str, option_count: usize) -> Option<usize> {
    match answer.trim().parse::<usize>() {
        Ok(n) if (1..=option_count).contains(&n) => Some(n - 1),
        _ => None,
    }
}
