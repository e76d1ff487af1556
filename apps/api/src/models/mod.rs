pub mod humanization;
