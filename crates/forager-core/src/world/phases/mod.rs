mod field;
mod forager;
mod prey;
mod social;
