mod common;
mod content;
mod evaluation;
