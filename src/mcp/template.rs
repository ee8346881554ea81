//! Parsing and re-emitting `claude mcp add` templates.
//!
//! Registry entries may carry a `claude-cli` installation method whose command
//! is a shell line such as:
//!
//! ```text
//! claude mcp add brave-search -e BRAVE_API_KEY=YOUR_KEY -- npx -y @modelcontextprotocol/server-brave-search
//! claude mcp add --transport sse linear https://mcp.linear.app/sse
//! ```
//!
//! [`ClaudeTemplate::parse`] pulls out the transport, env and header flags, the
//! server name and either the URL or the `--` command. [`ClaudeTemplate::to_args`]
//! rebuilds the argument vector with the caller's scope and env overrides.
//! A `--scope` in the template is replaced, never duplicated.

use anyhow::Result;

use super::models::{Scope, Transport};
use crate::core::BwcError;

const SOURCE_NAME: &str = "claude-cli template";

/// A parsed `claude mcp add` command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClaudeTemplate {
    /// Server name
    pub name: String,
    /// `--transport`, if given
    pub transport: Option<Transport>,
    /// `-e KEY=VALUE` pairs in order
    pub env: Vec<(String, String)>,
    /// `-H "Name: value"` headers in order
    pub headers: Vec<String>,
    /// Remote endpoint
    pub url: Option<String>,
    /// Command and arguments for stdio servers
    pub command: Vec<String>,
}

fn parse_error(reason: impl Into<String>) -> anyhow::Error {
    BwcError::ParseError {
        source_name: SOURCE_NAME.to_string(),
        reason: reason.into(),
    }
    .into()
}

/// Splits a command line into words, honouring single and double quotes.
pub fn tokenize(line: &str) -> Result<Vec<String>> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut quote: Option<char> = None;
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match quote {
            Some(q) if c == q => quote = None,
            Some('"') if c == '\\' => {
                if let Some(next) = chars.next() {
                    current.push(next);
                }
            }
            Some(_) => current.push(c),
            None => match c {
                '\'' | '"' => {
                    quote = Some(c);
                    in_token = true;
                }
                '\\' => {
                    if let Some(next) = chars.next() {
                        current.push(next);
                        in_token = true;
                    }
                }
                c if c.is_whitespace() => {
                    if in_token {
                        tokens.push(std::mem::take(&mut current));
                        in_token = false;
                    }
                }
                c => {
                    current.push(c);
                    in_token = true;
                }
            },
        }
    }

    if quote.is_some() {
        return Err(parse_error(format!("unterminated quote in: {line}")));
    }
    if in_token {
        tokens.push(current);
    }
    Ok(tokens)
}

fn looks_like_url(s: &str) -> bool {
    s.starts_with("http://") || s.starts_with("https://")
}

impl ClaudeTemplate {
    /// A remote server template built from a transport and URL.
    #[must_use]
    pub fn remote(name: &str, transport: Transport, url: &str) -> Self {
        Self {
            name: name.to_string(),
            transport: Some(transport),
            url: Some(url.to_string()),
            ..Self::default()
        }
    }

    /// Parses a template command line.
    pub fn parse(line: &str) -> Result<Self> {
        let tokens = tokenize(line)?;
        let mut iter = tokens.into_iter().peekable();

        // Optional program name, then the `mcp add` subcommand.
        if iter.peek().is_some_and(|t| t != "mcp") {
            iter.next();
        }
        if iter.next().as_deref() != Some("mcp") || iter.next().as_deref() != Some("add") {
            return Err(parse_error(format!("expected 'claude mcp add ...', got: {line}")));
        }

        let mut template = Self::default();
        let mut positionals = Vec::new();

        while let Some(token) = iter.next() {
            if token == "--" {
                template.command.extend(iter.by_ref());
                break;
            }

            let (flag, inline) = match token.split_once('=') {
                Some((f, v)) if f.starts_with("--") => (f.to_string(), Some(v.to_string())),
                _ => (token.clone(), None),
            };

            let mut value = |flag: &str| -> Result<String> {
                inline
                    .clone()
                    .or_else(|| iter.next())
                    .ok_or_else(|| parse_error(format!("missing value for {flag}")))
            };

            match flag.as_str() {
                "--transport" | "-t" => {
                    let raw = value(&flag)?;
                    template.transport = Some(raw.parse::<Transport>().map_err(|e| parse_error(e.to_string()))?);
                }
                "--env" | "-e" => {
                    let raw = value(&flag)?;
                    let (k, v) = raw
                        .split_once('=')
                        .ok_or_else(|| parse_error(format!("expected KEY=VALUE after {flag}, got '{raw}'")))?;
                    template.env.push((k.to_string(), v.to_string()));
                }
                "--header" | "-H" => template.headers.push(value(&flag)?),
                "--scope" | "-s" => {
                    value(&flag)?;
                }
                _ if flag.starts_with('-') && positionals.is_empty() => {
                    return Err(parse_error(format!("unsupported option '{flag}'")));
                }
                _ => positionals.push(token),
            }
        }

        let mut positionals = positionals.into_iter();
        template.name = positionals.next().ok_or_else(|| parse_error("missing server name"))?;

        let rest: Vec<String> = positionals.collect();
        let remote = template.transport.is_some_and(Transport::is_remote);
        let first_is_url = rest.first().is_some_and(|f| looks_like_url(f));
        if !rest.is_empty() {
            if remote || (first_is_url && template.command.is_empty()) {
                let mut rest = rest.into_iter();
                template.url = rest.next();
                let extra: Vec<String> = rest.collect();
                if !extra.is_empty() {
                    return Err(parse_error(format!("unexpected arguments after URL: {}", extra.join(" "))));
                }
            } else {
                let mut command = rest;
                command.append(&mut template.command);
                template.command = command;
            }
        }

        if template.url.is_none() && template.command.is_empty() {
            return Err(parse_error(format!("no command or URL for server '{}'", template.name)));
        }
        Ok(template)
    }

    /// Effective transport: explicit flag, else inferred from URL presence.
    #[must_use]
    pub fn effective_transport(&self) -> Transport {
        self.transport.unwrap_or(if self.url.is_some() {
            Transport::Http
        } else {
            Transport::Stdio
        })
    }

    /// Arguments for the Claude CLI (without the program name).
    ///
    /// `env_overrides` replace template values with the same key and append
    /// new keys after them.
    #[must_use]
    pub fn to_args(&self, scope: Scope, env_overrides: &[(String, String)]) -> Vec<String> {
        let mut args = vec!["mcp".to_string(), "add".to_string(), "--scope".to_string(), scope.to_string()];

        if let Some(transport) = self.transport
            && transport != Transport::Stdio
        {
            args.push("--transport".to_string());
            args.push(transport.to_string());
        }

        args.push(self.name.clone());

        if let Some(url) = &self.url {
            args.push(url.clone());
        }
        for header in &self.headers {
            args.push("-H".to_string());
            args.push(header.clone());
        }

        let mut env = self.env.clone();
        for (key, value) in env_overrides {
            match env.iter_mut().find(|(k, _)| k == key) {
                Some(slot) => slot.1.clone_from(value),
                None => env.push((key.clone(), value.clone())),
            }
        }
        for (key, value) in env {
            args.push("-e".to_string());
            args.push(format!("{key}={value}"));
        }

        if self.url.is_none() && !self.command.is_empty() {
            args.push("--".to_string());
            args.extend(self.command.iter().cloned());
        }
        args
    }
}
