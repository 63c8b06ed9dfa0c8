//! Topic registry for pub/sub routing
//!
//! The registry is the only state shared across connection tasks: it maps
//! each topic to its publisher and subscriber sessions, plus the set of all
//! active sessions for bulk shutdown.
//!
//! # Architecture
//!
//! ```text
//!                          Arc<TopicRegistry>
//!                     ┌─────────────────────────┐
//!                     │ topics: HashMap<Topic,  │
//!                     │   TopicEntry {          │
//!                     │     publishers,         │
//!                     │     subscribers,        │
//!                     │   }                     │
//!                     │ >                       │
//!                     │ sessions: all active    │
//!                     └───────────┬─────────────┘
//!                                 │
//!         ┌───────────────────────┼───────────────────────┐
//!         │                       │                       │
//!         ▼                       ▼                       ▼
//!    [Publisher]            [Subscriber]            [Subscriber]
//!    publish(line)          read loop               read loop
//!         │                                              ▲
//!         └──► subscribers_of() snapshot ──► send_line ──┘
//! ```
//!
//! # Snapshot Discipline
//!
//! Broadcast never iterates the live maps. `subscribers_of` copies the
//! member list under the lock and releases it before any send, so
//! registration, removal, and send-failure cleanup can all proceed while a
//! broadcast is in flight without deadlock or torn reads.

pub mod entry;
pub mod store;

pub use entry::TopicEntry;
pub use store::TopicRegistry;
