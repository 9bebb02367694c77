pub mod folding;
