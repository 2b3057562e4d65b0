//! In-memory team service for tests and the offline demo.
//!
//! Replies are scripted per endpoint. Each endpoint holds a queue: a call
//! pops the front reply while more than one is queued and repeats the last
//! one afterwards. Call counters let tests assert how often the service was
//! hit.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use team_protocol::{
    ApiResponse, HierarchySnapshot, Member, ReferralData, ReferralStats, Sponsor, UserRef,
};

use crate::{ApiError, ApiFuture, TeamApi};

/// A scripted outcome for one call.
#[derive(Debug, Clone)]
pub enum MockReply<T> {
    Respond(ApiResponse<T>),
    Fail(ApiError),
}

struct Script<T> {
    replies: VecDeque<MockReply<T>>,
    delays: VecDeque<Duration>,
}

impl<T: Clone> Script<T> {
    fn new(reply: MockReply<T>) -> Self {
        Self { replies: VecDeque::from([reply]), delays: VecDeque::new() }
    }

    fn next(&mut self) -> (MockReply<T>, Option<Duration>) {
        let reply = if self.replies.len() > 1 {
            self.replies.pop_front()
        } else {
            self.replies.front().cloned()
        };
        let reply = reply.unwrap_or_else(|| MockReply::Fail(ApiError::Transport("no scripted reply".into())));
        (reply, self.delays.pop_front())
    }
}

/// Scripted [`TeamApi`].
pub struct MockTeamApi {
    init_failure: Mutex<Option<ApiError>>,
    referral: Mutex<Script<ReferralData>>,
    downline: Mutex<Script<HierarchySnapshot>>,
    delay: Duration,
    initialize_calls: AtomicUsize,
    referral_calls: AtomicUsize,
    downline_calls: AtomicUsize,
}

fn lock<T>(m: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl Default for MockTeamApi {
    fn default() -> Self {
        Self::new()
    }
}

impl MockTeamApi {
    /// A service that accepts initialization and answers both fetches with
    /// `success: true` and no data.
    pub fn new() -> Self {
        Self {
            init_failure: Mutex::new(None),
            referral: Mutex::new(Script::new(MockReply::Respond(ApiResponse::empty()))),
            downline: Mutex::new(Script::new(MockReply::Respond(ApiResponse::empty()))),
            delay: Duration::ZERO,
            initialize_calls: AtomicUsize::new(0),
            referral_calls: AtomicUsize::new(0),
            downline_calls: AtomicUsize::new(0),
        }
    }

    /// A service pre-loaded with a small sample team.
    pub fn demo() -> Self {
        Self::new()
            .with_referral(MockReply::Respond(ApiResponse::ok(sample_referral())))
            .with_downline(MockReply::Respond(ApiResponse::ok(sample_hierarchy())))
            .with_delay(Duration::from_millis(400))
    }

    pub fn with_referral(self, reply: MockReply<ReferralData>) -> Self {
        *lock(&self.referral) = Script::new(reply);
        self
    }

    pub fn with_downline(self, reply: MockReply<HierarchySnapshot>) -> Self {
        *lock(&self.downline) = Script::new(reply);
        self
    }

    pub fn failing_initialize(self, error: ApiError) -> Self {
        *lock(&self.init_failure) = Some(error);
        self
    }

    /// Delay applied to every fetch without a queued delay of its own.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Queue another referral reply, consumed after the ones already queued.
    pub fn push_referral(&self, reply: MockReply<ReferralData>) {
        lock(&self.referral).replies.push_back(reply);
    }

    /// Queue a per-call delay for the next referral fetches, in call order.
    pub fn push_referral_delay(&self, delay: Duration) {
        lock(&self.referral).delays.push_back(delay);
    }

    pub fn set_downline(&self, reply: MockReply<HierarchySnapshot>) {
        *lock(&self.downline) = Script::new(reply);
    }

    pub fn initialize_calls(&self) -> usize {
        self.initialize_calls.load(Ordering::SeqCst)
    }

    pub fn referral_calls(&self) -> usize {
        self.referral_calls.load(Ordering::SeqCst)
    }

    pub fn downline_calls(&self) -> usize {
        self.downline_calls.load(Ordering::SeqCst)
    }

    async fn settle<T>(&self, (reply, delay): (MockReply<T>, Option<Duration>)) -> Result<ApiResponse<T>, ApiError> {
        let delay = delay.unwrap_or(self.delay);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        match reply {
            MockReply::Respond(response) => Ok(response),
            MockReply::Fail(error) => Err(error),
        }
    }
}

impl TeamApi for MockTeamApi {
    fn initialize_membership(&self) -> ApiFuture<'_, ()> {
        Box::pin(async move {
            self.initialize_calls.fetch_add(1, Ordering::SeqCst);
            let failure = lock(&self.init_failure).clone();
            match failure {
                Some(error) => Err(error),
                None => Ok(()),
            }
        })
    }

    fn get_my_referral_code(&self) -> ApiFuture<'_, ApiResponse<ReferralData>> {
        Box::pin(async move {
            self.referral_calls.fetch_add(1, Ordering::SeqCst);
            let next = lock(&self.referral).next();
            self.settle(next).await
        })
    }

    fn get_downline_structure(&self) -> ApiFuture<'_, ApiResponse<HierarchySnapshot>> {
        Box::pin(async move {
            self.downline_calls.fetch_add(1, Ordering::SeqCst);
            let next = lock(&self.downline).next();
            self.settle(next).await
        })
    }
}

// ---------------------------------------------------------------------------
// Sample data
// ---------------------------------------------------------------------------

pub fn sample_referral() -> ReferralData {
    ReferralData {
        referral_code: "TEAM-7Q2K9".to_string(),
        referral_link: "https://dashboard.example.com/join?ref=TEAM-7Q2K9".to_string(),
        stats: ReferralStats {
            direct_count: Some(3),
            total_downline: Some(7),
            level: Some(1),
            total_earnings: Some(182.4),
        },
        sponsor: Some(Sponsor { name: Some("Grace Hopper".to_string()) }),
    }
}

fn sample_member(id: &str, name: &str, level: u32, earnings: f64, children: Vec<Member>) -> Member {
    let direct = children.len() as u64;
    let downline = children.iter().map(|c| 1 + c.total_downline()).sum();
    Member {
        id: Some(id.to_string()),
        user: Some(UserRef {
            name: Some(name.to_string()),
            email: Some(format!("{}@example.com", name.split(' ').next().unwrap_or(name).to_lowercase())),
        }),
        level: Some(level),
        direct_count: Some(direct),
        total_downline: Some(downline),
        total_earnings: Some(earnings),
        children,
    }
}

pub fn sample_hierarchy() -> HierarchySnapshot {
    let root = sample_member(
        "m-root",
        "You",
        1,
        182.4,
        vec![
            sample_member(
                "m-ada",
                "Ada Lovelace",
                1,
                64.0,
                vec![
                    sample_member("m-alan", "Alan Turing", 0, 0.0, vec![]),
                    sample_member(
                        "m-edsger",
                        "Edsger Dijkstra",
                        0,
                        5.5,
                        vec![sample_member("m-barbara", "Barbara Liskov", 0, 0.0, vec![])],
                    ),
                ],
            ),
            sample_member("m-ken", "Ken Thompson", 0, 12.0, vec![]),
            sample_member("m-linus", "Linus Torvalds", 0, 0.0, vec![sample_member("m-greg", "Greg Kroah", 0, 0.0, vec![])]),
        ],
    );
    HierarchySnapshot { total_members: Some(root.total_downline()), member: Some(root) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn queued_replies_are_consumed_in_order_then_repeat() {
        let api = MockTeamApi::new().with_referral(MockReply::Respond(ApiResponse::rejected(Some("first".into()))));
        api.push_referral(MockReply::Respond(ApiResponse::rejected(Some("second".into()))));

        let a = api.get_my_referral_code().await.unwrap();
        let b = api.get_my_referral_code().await.unwrap();
        let c = api.get_my_referral_code().await.unwrap();
        assert_eq!(a.message.as_deref(), Some("first"));
        assert_eq!(b.message.as_deref(), Some("second"));
        assert_eq!(c.message.as_deref(), Some("second"));
        assert_eq!(api.referral_calls(), 3);
    }

    #[tokio::test]
    async fn scripted_init_failure_is_returned() {
        let api = MockTeamApi::new().failing_initialize(ApiError::Transport("down".into()));
        assert!(api.initialize_membership().await.is_err());
        assert_eq!(api.initialize_calls(), 1);
    }

    #[test]
    fn sample_hierarchy_counts_are_consistent() {
        let snapshot = sample_hierarchy();
        let root = snapshot.member.as_ref().unwrap();
        assert_eq!(root.direct_count(), 3);
        assert_eq!(snapshot.total_members(), 7);
    }
}
