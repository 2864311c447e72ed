mod common;

mod criteria;
