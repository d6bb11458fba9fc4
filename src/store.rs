//! In-process resource stores. Each store is a map under one RwLock; the
//! ownership-sensitive accessors take `id` and `owner` together so the fetch
//! and the ownership check happen in a single lock scope; there is no
//! fetch-then-check window in which the row could change hands. Lock guards
//! never cross an await point.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use parking_lot::RwLock;
use uuid::Uuid;

use crate::model::{FollowerEdge, Like, Reply, Tweet, TweetKind, User};

#[derive(Debug, Clone, Default)]
pub struct Stores {
    pub users: UserStore,
    pub tweets: TweetStore,
    pub likes: LikeStore,
    pub replies: ReplyStore,
    pub followers: FollowerStore,
}

impl Stores {
    pub fn new() -> Self { Self::default() }
}

#[derive(Debug, Clone, Default)]
pub struct UserStore {
    inner: Arc<RwLock<HashMap<Uuid, User>>>,
}

impl UserStore {
    pub fn insert(&self, user: User) {
        self.inner.write().insert(user.id, user);
    }

    pub fn get(&self, id: Uuid) -> Option<User> {
        self.inner.read().get(&id).cloned()
    }

    pub fn exists(&self, id: Uuid) -> bool {
        self.inner.read().contains_key(&id)
    }

    pub fn find_by_email(&self, email: &str) -> Option<User> {
        self.inner.read().values().find(|u| u.email == email).cloned()
    }

    pub fn email_taken(&self, email: &str) -> bool {
        self.inner.read().values().any(|u| u.email == email)
    }

    /// All users, optionally filtered by an email substring.
    pub fn list(&self, email_contains: Option<&str>) -> Vec<User> {
        let m = self.inner.read();
        let mut out: Vec<User> = m
            .values()
            .filter(|u| email_contains.map(|needle| u.email.contains(needle)).unwrap_or(true))
            .cloned()
            .collect();
        out.sort_by_key(|u| u.created_at);
        out
    }

    /// Apply a profile update in one lock scope. Returns the updated row.
    pub fn update_with<F: FnOnce(&mut User)>(&self, id: Uuid, apply: F) -> Option<User> {
        let mut m = self.inner.write();
        let user = m.get_mut(&id)?;
        apply(user);
        user.updated_at = Utc::now();
        Some(user.clone())
    }

    pub fn remove(&self, id: Uuid) -> Option<User> {
        self.inner.write().remove(&id)
    }
}

#[derive(Debug, Clone, Default)]
pub struct TweetStore {
    inner: Arc<RwLock<HashMap<Uuid, Tweet>>>,
}

impl TweetStore {
    pub fn insert(&self, tweet: Tweet) {
        self.inner.write().insert(tweet.id, tweet);
    }

    pub fn exists(&self, id: Uuid) -> bool {
        self.inner.read().contains_key(&id)
    }

    pub fn list(&self, kind: Option<TweetKind>) -> Vec<Tweet> {
        let m = self.inner.read();
        let mut out: Vec<Tweet> = m
            .values()
            .filter(|t| kind.map(|k| t.kind == k).unwrap_or(true))
            .cloned()
            .collect();
        out.sort_by_key(|t| t.created_at);
        out
    }

    /// Fetch scoped by id AND owner; a miss is indistinguishable between
    /// "absent" and "foreign-owned".
    pub fn get_owned(&self, id: Uuid, owner: Uuid) -> Option<Tweet> {
        self.inner.read().get(&id).filter(|t| t.user_id == owner).cloned()
    }

    pub fn update_owned(&self, id: Uuid, owner: Uuid, content: String) -> Option<Tweet> {
        let mut m = self.inner.write();
        let tweet = m.get_mut(&id).filter(|t| t.user_id == owner)?;
        tweet.content = content;
        tweet.updated_at = Utc::now();
        Some(tweet.clone())
    }

    pub fn remove_owned(&self, id: Uuid, owner: Uuid) -> Option<Tweet> {
        let mut m = self.inner.write();
        if m.get(&id).map(|t| t.user_id == owner) != Some(true) {
            return None;
        }
        m.remove(&id)
    }
}

#[derive(Debug, Clone, Default)]
pub struct LikeStore {
    inner: Arc<RwLock<HashMap<Uuid, Like>>>,
}

impl LikeStore {
    pub fn insert(&self, like: Like) {
        self.inner.write().insert(like.id, like);
    }

    pub fn pair_exists(&self, user_id: Uuid, tweet_id: Uuid) -> bool {
        self.inner.read().values().any(|l| l.user_id == user_id && l.tweet_id == tweet_id)
    }

    pub fn count_for_tweet(&self, tweet_id: Uuid) -> usize {
        self.inner.read().values().filter(|l| l.tweet_id == tweet_id).count()
    }

    pub fn liked_by(&self, tweet_id: Uuid, user_id: Uuid) -> bool {
        self.pair_exists(user_id, tweet_id)
    }

    pub fn remove_owned(&self, id: Uuid, owner: Uuid) -> Option<Like> {
        let mut m = self.inner.write();
        if m.get(&id).map(|l| l.user_id == owner) != Some(true) {
            return None;
        }
        m.remove(&id)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ReplyStore {
    inner: Arc<RwLock<HashMap<Uuid, Reply>>>,
}

impl ReplyStore {
    pub fn insert(&self, reply: Reply) {
        self.inner.write().insert(reply.id, reply);
    }

    /// The reply surface is per-owner: listing returns only the caller's rows.
    pub fn list_owned(&self, owner: Uuid, kind: Option<TweetKind>) -> Vec<Reply> {
        let m = self.inner.read();
        let mut out: Vec<Reply> = m
            .values()
            .filter(|r| r.user_id == owner && kind.map(|k| r.kind == k).unwrap_or(true))
            .cloned()
            .collect();
        out.sort_by_key(|r| r.created_at);
        out
    }

    pub fn get_owned(&self, id: Uuid, owner: Uuid) -> Option<Reply> {
        self.inner.read().get(&id).filter(|r| r.user_id == owner).cloned()
    }

    pub fn update_owned(&self, id: Uuid, owner: Uuid, content: String) -> Option<Reply> {
        let mut m = self.inner.write();
        let reply = m.get_mut(&id).filter(|r| r.user_id == owner)?;
        reply.content = content;
        Some(reply.clone())
    }

    pub fn remove_owned(&self, id: Uuid, owner: Uuid) -> Option<Reply> {
        let mut m = self.inner.write();
        if m.get(&id).map(|r| r.user_id == owner) != Some(true) {
            return None;
        }
        m.remove(&id)
    }
}

#[derive(Debug, Clone, Default)]
pub struct FollowerStore {
    inner: Arc<RwLock<HashMap<Uuid, FollowerEdge>>>,
}

impl FollowerStore {
    /// Insert the edge unless the same ordered pair already exists. Returns
    /// false on a duplicate; check and insert share one lock scope so two
    /// concurrent creates cannot both succeed.
    pub fn insert_unique(&self, edge: FollowerEdge) -> bool {
        let mut m = self.inner.write();
        if m.values().any(|e| e.user_id == edge.user_id && e.follower_id == edge.follower_id) {
            return false;
        }
        m.insert(edge.id, edge);
        true
    }

    pub fn list(&self, user_id: Option<Uuid>, follower_id: Option<Uuid>) -> Vec<FollowerEdge> {
        let m = self.inner.read();
        let mut out: Vec<FollowerEdge> = m
            .values()
            .filter(|e| user_id.map(|u| e.user_id == u).unwrap_or(true))
            .filter(|e| follower_id.map(|f| e.follower_id == f).unwrap_or(true))
            .cloned()
            .collect();
        out.sort_by_key(|e| e.created_at);
        out
    }

    pub fn remove_owned(&self, id: Uuid, follower_id: Uuid) -> Option<FollowerEdge> {
        let mut m = self.inner.write();
        if m.get(&id).map(|e| e.follower_id == follower_id) != Some(true) {
            return None;
        }
        m.remove(&id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tweet(owner: Uuid) -> Tweet {
        let now = Utc::now();
        Tweet {
            id: Uuid::new_v4(),
            content: "hello".into(),
            kind: TweetKind::Tweet,
            user_id: owner,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn owner_scoped_fetch_misses_for_strangers() {
        let store = TweetStore::default();
        let owner = Uuid::new_v4();
        let t = tweet(owner);
        let id = t.id;
        store.insert(t);

        assert!(store.get_owned(id, owner).is_some());
        assert!(store.get_owned(id, Uuid::new_v4()).is_none());
        assert!(store.get_owned(Uuid::new_v4(), owner).is_none());
    }

    #[test]
    fn owner_scoped_mutations_leave_foreign_rows_unchanged() {
        let store = TweetStore::default();
        let owner = Uuid::new_v4();
        let t = tweet(owner);
        let id = t.id;
        store.insert(t);

        assert!(store.update_owned(id, Uuid::new_v4(), "hijacked".into()).is_none());
        assert_eq!(store.get_owned(id, owner).unwrap().content, "hello");

        assert!(store.remove_owned(id, Uuid::new_v4()).is_none());
        assert!(store.exists(id));
        assert!(store.remove_owned(id, owner).is_some());
        assert!(!store.exists(id));
    }

    #[test]
    fn follower_edge_pair_is_unique() {
        let store = FollowerStore::default();
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        let now = Utc::now();
        let edge = FollowerEdge { id: Uuid::new_v4(), user_id: a, follower_id: b, created_at: now };
        assert!(store.insert_unique(edge));
        let dup = FollowerEdge { id: Uuid::new_v4(), user_id: a, follower_id: b, created_at: now };
        assert!(!store.insert_unique(dup));
        // The reverse direction is a different edge.
        let rev = FollowerEdge { id: Uuid::new_v4(), user_id: b, follower_id: a, created_at: now };
        assert!(store.insert_unique(rev));
    }
}
