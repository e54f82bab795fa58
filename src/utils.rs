/// Join items into a human readable list, for error messages.
pub fn items_to_strings(items: Vec<&str>) -> String {
    items.join(", ")
}
