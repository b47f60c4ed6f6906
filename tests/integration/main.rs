mod crawl_tests;
mod sources_tests;
mod youtube_tests;
