// Generated by genmsg. Do not edit.

pub mod demo_msgs;
