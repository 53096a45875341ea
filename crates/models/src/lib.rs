pub mod errors;
pub mod db;
pub mod country;
pub mod company;
pub mod user;

#[cfg(test)]
mod tests;
