const TITLE: &str = r#"
 __        __          _                _
 \ \      / /_ _ _   _| |__   __ _  ___| | __
  \ \ /\ / / _` | | | | '_ \ / _` |/ __| |/ /
   \ V  V / (_| | |_| | |_) | (_| | (__|   <
    \_/\_/ \__,_|\__, |_.__/ \__,_|\___|_|\_\
                 |___/        image scraper
"#;

/// Program title, printed before the logger takes over the terminal.
pub fn draw_title() {
    println!("{TITLE}");
}
