pub mod xbox_one;
