mod job;

pub use job::{Job, JobChangeset, JobFilter, NewJob};
