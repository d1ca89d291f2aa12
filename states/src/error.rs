use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("State closed: {name}, its owner was dropped")]
    Closed { name: &'static str },
}

impl Error {
    pub fn closed(name: &'static str) -> Self {
        Self::Closed { name }
    }
}
