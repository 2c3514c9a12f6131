pub async fn get_banner() -> &'static str {
    "paintboard"
}
