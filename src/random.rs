use rand::{distributions::Alphanumeric, thread_rng, Rng};
use std::iter;

pub fn random_string(length: usize) -> String {
    iter::repeat(())
        .map(|()| thread_rng().sample(Alphanumeric))
        .map(char::from)
        .take(length)
        .collect()
}
