pub mod package;
pub mod relworx;
pub mod transaction;
