//! Serialized console output
//!
//! Workers run concurrently but the operator reads one terminal. Every
//! status line, command echo, and captured subprocess dump goes through a
//! single mutual-exclusion gate so interleaved output is never garbled. The
//! gate is an explicit value handed to each worker; there is no ambient
//! global stream.

use std::sync::Arc;
use tokio::sync::Mutex;

/// A cloneable handle to the serialized console
#[derive(Debug, Clone, Default)]
pub struct OutputGate {
    lock: Arc<Mutex<()>>,
}

impl OutputGate {
    /// Create a new gate
    pub fn new() -> Self {
        Self::default()
    }

    /// Print a single line while holding the gate
    pub async fn line<S: AsRef<str>>(&self, text: S) {
        let _held = self.lock.lock().await;
        println!("{}", text.as_ref());
    }

    /// Print a multi-line chunk (e.g. captured converter output) as one
    /// uninterrupted block
    pub async fn chunk<S: AsRef<str>>(&self, text: S) {
        let text = text.as_ref();
        if text.is_empty() {
            return;
        }
        let _held = self.lock.lock().await;
        if text.ends_with('\n') {
            print!("{text}");
        } else {
            println!("{text}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_one_gate() {
        let gate = OutputGate::new();
        let clone = gate.clone();
        assert!(Arc::ptr_eq(&gate.lock, &clone.lock));
    }

    #[tokio::test]
    async fn test_gate_is_reentrant_across_calls() {
        let gate = OutputGate::new();
        gate.line("first").await;
        gate.chunk("second\nthird\n").await;
        gate.chunk("").await;
    }
}
