use std::{future::Future, pin::Pin};

pub mod dao;

pub type BoxedResultSendFuture<'r, T, E> =
    Pin<Box<dyn Future<Output = Result<T, E>> + 'r + Send>>;
