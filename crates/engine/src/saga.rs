// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Ordered forward/backward action runner.
//!
//! A [`Pipeline`] runs its actions in order against one mutable context.
//! When action `i` fails, the backward actions of `0..i` run in reverse order
//! and the original error is returned. The failing action is responsible for
//! undoing its own partial work before it returns.

use async_trait::async_trait;
use std::fmt;

/// One step of a pipeline.
#[async_trait]
pub trait Action<C, E>: Send + Sync
where
    C: Send,
    E: Send,
{
    fn name(&self) -> &str;

    async fn forward(&self, ctx: &mut C) -> Result<(), E>;

    /// Undo a completed forward. Best effort; failures are the action's to log.
    async fn backward(&self, _ctx: &mut C) {}
}

pub struct Pipeline<C, E> {
    actions: Vec<Box<dyn Action<C, E>>>,
}

impl<C, E> Pipeline<C, E>
where
    C: Send,
    E: Send + fmt::Display,
{
    pub fn new(actions: Vec<Box<dyn Action<C, E>>>) -> Self {
        Self { actions }
    }

    pub fn names(&self) -> Vec<&str> {
        self.actions.iter().map(|a| a.name()).collect()
    }

    pub async fn execute(&self, ctx: &mut C) -> Result<(), E> {
        for (i, action) in self.actions.iter().enumerate() {
            tracing::debug!(action = action.name(), "running pipeline action");
            if let Err(err) = action.forward(ctx).await {
                tracing::warn!(
                    action = action.name(),
                    error = %err,
                    "pipeline action failed, rolling back"
                );
                for done in self.actions[..i].iter().rev() {
                    tracing::debug!(action = done.name(), "rolling back pipeline action");
                    done.backward(ctx).await;
                }
                return Err(err);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "saga_tests.rs"]
mod tests;
