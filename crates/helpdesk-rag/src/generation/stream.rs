//! Cancellable answer token stream
//!
//! Generation is modeled as a single-consumer producer/consumer channel: a
//! producer task feeds tokens from the model call into a bounded mpsc
//! channel in strict FIFO order, and the consumer suspends while waiting for
//! the next token. The stream is finite, forward-only, and non-restartable;
//! a second read requires a new model call.

use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::error::{Error, Result};

/// Channel capacity for in-flight tokens. Keeps the producer loosely coupled
/// to a slow consumer without buffering a whole answer.
pub(crate) const TOKEN_CHANNEL_CAPACITY: usize = 64;

/// A lazy, finite sequence of answer text tokens
#[derive(Debug)]
pub struct AnswerStream {
    rx: mpsc::Receiver<Result<String>>,
    producer: Option<JoinHandle<()>>,
}

impl AnswerStream {
    /// Wrap a receiver and its producer task
    pub(crate) fn new(rx: mpsc::Receiver<Result<String>>, producer: JoinHandle<()>) -> Self {
        Self {
            rx,
            producer: Some(producer),
        }
    }

    /// Build a stream from pre-computed tokens (no producer task).
    /// Used by tests and mock providers.
    pub fn from_tokens(tokens: Vec<String>) -> Self {
        let (tx, rx) = mpsc::channel(tokens.len().max(1));
        for token in tokens {
            // Capacity matches the token count, so this cannot fail.
            let _ = tx.try_send(Ok(token));
        }
        Self { rx, producer: None }
    }

    /// Await the next token. `None` means generation completed.
    ///
    /// A mid-stream failure surfaces as `Some(Err(_))`; tokens already
    /// yielded before the failure are not retracted.
    pub async fn next_token(&mut self) -> Option<Result<String>> {
        self.rx.recv().await
    }

    /// Stop token production: aborts the producer task, which drops the
    /// underlying model call, and closes the channel. Tokens already queued
    /// are discarded.
    pub fn cancel(&mut self) {
        if let Some(producer) = self.producer.take() {
            producer.abort();
        }
        self.rx.close();
        // Drain anything the producer managed to queue before the abort.
        while self.rx.try_recv().is_ok() {}
    }

    /// Drain the stream into a single answer string.
    /// Fails with `Synthesis` if the stream aborted mid-answer.
    pub async fn collect(mut self) -> Result<String> {
        let mut answer = String::new();
        while let Some(token) = self.next_token().await {
            let token = token.map_err(|e| Error::synthesis(&e))?;
            answer.push_str(&token);
        }
        Ok(answer)
    }
}

impl futures_util::Stream for AnswerStream {
    type Item = Result<String>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.rx.poll_recv(cx)
    }
}

impl Drop for AnswerStream {
    fn drop(&mut self) {
        if let Some(producer) = self.producer.take() {
            producer.abort();
        }
    }
}
