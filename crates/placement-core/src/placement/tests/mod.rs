mod common;
mod pipeline;
mod shortlist;
