mod golden;
mod samples;
