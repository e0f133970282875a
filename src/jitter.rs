//! Spread whole-second timestamps across their second.
//!
//! Chat APIs often report second precision, which makes every comment of a
//! busy second start on the same frame. Comments that land exactly on a
//! second boundary get a random sub-second offset.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::comment::Comment;

/// Jitter whole-second comments and re-sort the stream.
///
/// With `seed = Some(_)` the result is reproducible.
#[must_use]
pub fn jitter(mut comments: Vec<Comment>, seed: Option<u64>) -> Vec<Comment> {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    for comment in &mut comments {
        if comment.emitted_at % 100 == 0 {
            comment.emitted_at = comment.emitted_at.saturating_add(rng.gen_range(0..100));
        }
    }

    comments.sort_by_key(|c| c.emitted_at);
    comments
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_whole_seconds_move() {
        let comments = vec![Comment::new(150, "a", "x"), Comment::new(200, "b", "y")];
        let out = jitter(comments, Some(7));
        let a = out.iter().find(|c| c.author_id == "a").unwrap();
        let b = out.iter().find(|c| c.author_id == "b").unwrap();
        assert_eq!(a.emitted_at, 150);
        assert!((200..300).contains(&b.emitted_at));
    }

    #[test]
    fn output_is_sorted() {
        let comments: Vec<_> = (0..100).map(|i| Comment::new((i / 10) * 100, "u", "x")).collect();
        let out = jitter(comments, Some(1));
        assert!(out.windows(2).all(|w| w[0].emitted_at <= w[1].emitted_at));
        assert_eq!(out.len(), 100);
    }

    #[test]
    fn seeded_jitter_is_reproducible() {
        let comments: Vec<_> = (0..20).map(|i| Comment::new(i * 100, "u", i.to_string())).collect();
        assert_eq!(jitter(comments.clone(), Some(99)), jitter(comments, Some(99)));
    }
}
