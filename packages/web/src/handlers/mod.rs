//! Route handlers. Each one takes a [`RequestContext`](crate::context::RequestContext)
//! first, calls exactly one use-case from the `api` crate, and answers with a
//! redirect or a rendered view.

pub mod accounts;
pub mod appointments;
