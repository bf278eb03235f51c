// Resume/skills based job recommendations.
// Pipeline: text source chain → tokenize → overlap scoring over approved jobs.

pub mod engine;
pub mod extract;
pub mod handlers;
pub mod tokenize;
