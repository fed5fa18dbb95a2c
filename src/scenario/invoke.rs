//! The function under test

use std::future::Future;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command as TokioCommand;

use crate::common::{Error, Result};

use super::types::Arguments;

/// Prefix of the environment variables a [`CommandInvokable`] exports
pub const ARG_ENV_PREFIX: &str = "SCENARIO_ARG_";

/// Something that turns named arguments into a textual answer
///
/// `Ok(None)` is a valid, empty answer.
#[async_trait]
pub trait Invokable: Send + Sync {
    async fn invoke(&self, arguments: &Arguments) -> Result<Option<String>>;
}

#[async_trait]
impl<F, Fut> Invokable for F
where
    F: Fn(Arguments) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Option<String>>> + Send + 'static,
{
    async fn invoke(&self, arguments: &Arguments) -> Result<Option<String>> {
        (self)(arguments.clone()).await
    }
}

/// Runs a shell command per invocation and answers with its stdout
///
/// Each argument is exported as `SCENARIO_ARG_<NAME>`, the name upper-cased
/// with non-alphanumeric characters replaced by `_`.
#[derive(Debug, Clone)]
pub struct CommandInvokable {
    command: String,
}

impl CommandInvokable {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }
}

/// Environment variable name for an argument
pub fn argument_env_name(name: &str) -> String {
    let suffix: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect();
    format!("{ARG_ENV_PREFIX}{suffix}")
}

fn shell_command(command: &str) -> TokioCommand {
    #[cfg(windows)]
    {
        let mut cmd = TokioCommand::new("cmd");
        cmd.arg("/C").arg(command);
        cmd
    }
    #[cfg(not(windows))]
    {
        let mut cmd = TokioCommand::new("sh");
        cmd.arg("-c").arg(command);
        cmd
    }
}

#[async_trait]
impl Invokable for CommandInvokable {
    async fn invoke(&self, arguments: &Arguments) -> Result<Option<String>> {
        let output = shell_command(&self.command)
            .envs(arguments.iter().map(|(n, v)| (argument_env_name(n), v)))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| Error::Invocation(format!("Failed to run '{}': {}", self.command, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::Invocation(format!(
                "'{}' failed with exit code {:?}: {}",
                self.command,
                output.status.code(),
                stderr.trim()
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let answer = stdout.trim_end();
        if answer.is_empty() {
            Ok(None)
        } else {
            Ok(Some(answer.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_argument_env_name() {
        assert_eq!(argument_env_name("name"), "SCENARIO_ARG_NAME");
        assert_eq!(argument_env_name("user-input.1"), "SCENARIO_ARG_USER_INPUT_1");
    }

    #[tokio::test]
    async fn test_closure_invokable() {
        let greet = |args: Arguments| async move {
            Ok::<_, Error>(Some(format!(
                "Hello, {}!",
                args.get("name").unwrap_or("stranger")
            )))
        };
        let args: Arguments = [("name", "Ada")].into_iter().collect();
        assert_eq!(greet.invoke(&args).await.unwrap().as_deref(), Some("Hello, Ada!"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_command_invokable_exports_arguments() {
        let invokable = CommandInvokable::new("printf 'Hello, %s!\\n' \"$SCENARIO_ARG_NAME\"");
        let args: Arguments = [("name", "Ada")].into_iter().collect();
        let answer = invokable.invoke(&args).await.unwrap();
        assert_eq!(answer.as_deref(), Some("Hello, Ada!"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_command_invokable_empty_and_failing() {
        let silent = CommandInvokable::new("true");
        assert_eq!(silent.invoke(&Arguments::new()).await.unwrap(), None);

        let failing = CommandInvokable::new("echo oops >&2; exit 3");
        match failing.invoke(&Arguments::new()).await {
            Err(Error::Invocation(msg)) => {
                assert!(msg.contains("Some(3)"));
                assert!(msg.contains("oops"));
            }
            other => panic!("Expected invocation error, got {:?}", other),
        }
    }
}
