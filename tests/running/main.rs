mod fakes;
mod runner;
