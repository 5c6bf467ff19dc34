//! Paginated feed iteration.
//!
//! List and query operations return a [`QueryIterator`] that fetches pages
//! lazily, following the service's continuation tokens.
//!
//! # Overview
//!
//! - [`QueryIterator`]: The iterator and its state machine
//! - [`IteratorState`]: `Start`, `InProgress` or `Ended`
//! - [`FeedSource`]: Anything that can fetch one page for a continuation token
//! - [`QueryFeed`]: The [`FeedSource`] over a collection endpoint of a client
//! - [`FeedPage`]: One page of items with its response headers
//!
//! # State Machine
//!
//! ```text
//! Start ──fetch ok──▶ InProgress ──empty page, no token──▶ Ended
//!   ▲                  │  ▲                                  ▲
//!   │                  └──┘ token present                    │
//!   │                                                        │
//!   └──────── reset() from any state        fetch error ─────┘
//! ```

mod feed;
mod iterator;

pub use feed::QueryFeed;
pub use iterator::{FeedPage, FeedSource, IteratorState, QueryIterator};
