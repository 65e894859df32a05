mod common;

mod analytics;
