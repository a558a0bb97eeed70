mod tests_lexer;
mod tests_queries;
mod tests_expressions;
mod tests_recovery;
