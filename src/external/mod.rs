pub mod finnhub;
pub mod llm;
pub mod market_data;
pub mod news;
pub mod openai;
pub mod yahoo;
