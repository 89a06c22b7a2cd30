//! Site adapters.
//!
//! Each adapter owns a [`FetchPage`](crate::fetch::FetchPage) and turns one
//! site's markup into normalized records. Neither ever returns an error to
//! its caller: page-level failures are logged and folded into an empty or
//! degraded result, item-level failures drop only that item.
//!
//! # Supported Sources
//!
//! | Source | Module | Output | Notes |
//! |--------|--------|--------|-------|
//! | XHunt trends | [`xhunt`] | [`FeedPayload`](crate::models::FeedPayload) | Tweet leaderboard by group, hours and tag |
//! | Xinhua | [`xinhuanet`] | [`DetailRecord`](crate::models::DetailRecord)s | Listing page, then one paced fetch per detail page |

pub mod xhunt;
pub mod xinhuanet;
