mod builder;
mod display;
