use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Stdin};
use tokio::sync::Mutex;

use super::voice::{VoiceError, VoiceIo};

/// Text-terminal stand-in for speech: prompts go to stdout, answers are
/// read line by line from stdin.
pub struct ConsoleVoice {
    input: Mutex<BufReader<Stdin>>,
}

impl ConsoleVoice {
    pub fn new() -> Self {
        Self {
            input: Mutex::new(BufReader::new(tokio::io::stdin())),
        }
    }
}

impl ConsoleVoice {
    async fn read_line(&self) -> Result<String, VoiceError> {
        let mut line = String::new();
        let read = self
            .input
            .lock()
            .await
            .read_line(&mut line)
            .await
            .map_err(|e| VoiceError::Io(e.to_string()))?;
        if read == 0 {
            return Err(VoiceError::InputClosed);
        }
        Ok(line)
    }
}

impl Default for ConsoleVoice {
    fn default() -> Self {
        Self::new()
    }
}

async fn write_stdout(text: &str) -> Result<(), VoiceError> {
    let mut out = tokio::io::stdout();
    out.write_all(text.as_bytes())
        .await
        .map_err(|e| VoiceError::Io(e.to_string()))?;
    out.flush().await.map_err(|e| VoiceError::Io(e.to_string()))
}

#[async_trait]
impl VoiceIo for ConsoleVoice {
    async fn speak(&self, text: &str) -> Result<(), VoiceError> {
        write_stdout(&format!("\n{text}\n")).await
    }

    async fn listen(&self) -> Result<String, VoiceError> {
        write_stdout("> ").await?;
        self.read_line().await
    }

    async fn confirm(&self, transcript: &str) -> Result<Option<String>, VoiceError> {
        write_stdout(&format!(
            "Recorded: {transcript}\nPress Enter to confirm or type a correction: "
        ))
        .await?;
        let line = self.read_line().await?;
        let correction = line.trim();
        if correction.is_empty() {
            Ok(None)
        } else {
            Ok(Some(correction.to_string()))
        }
    }

    async fn cancel(&self) {
        tracing::debug!("Console voice cancelled");
    }
}
