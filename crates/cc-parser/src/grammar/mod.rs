mod declarators;
mod expressions;
mod external;
mod statements;
mod types;
