// Copyright 2025 the Morphic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Morphic Input: a deterministic, `no_std` input vocabulary for morph trees.
//!
//! ## Overview
//!
//! This crate holds the parts of event handling that do not need to know what
//! a morph is:
//!
//! - [`event`]: normalized [`InputEvent`](event::InputEvent)s plus button and key edge detection.
//! - [`router`]: target → bubble delivery sequences with pointer capture.
//! - [`hover`]: edge-triggered enter/leave transitions between hovered paths.
//! - [`click`]: click, double-click and drag-threshold disambiguation.
//!
//! It does not perform hit testing. Feed it node keys resolved elsewhere (for
//! example by `morphic_tree`) and act on what it answers.
//!
//! ## Dispatcher sketch
//!
//! ```
//! use morphic_input::router::{Router, ParentLookup, Outcome, deliver};
//!
//! struct Parents;
//! impl ParentLookup<u32> for Parents {
//!     fn parent_of(&self, n: &u32) -> Option<u32> { (*n > 1).then(|| n - 1) }
//! }
//!
//! let router = Router::new();
//! let seq = router.route(Some(3), &Parents);
//! // Node 3 has no handler, node 2 consumes the event.
//! let handled = deliver(&seq, |d| if d.node == 2 { Outcome::Stop } else { Outcome::Continue });
//! assert_eq!(handled, Some(2));
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod click;
pub mod event;
pub mod hover;
pub mod router;
