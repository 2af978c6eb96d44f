//! The `skinquiz init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    // Create skinquiz.toml
    if std::path::Path::new("skinquiz.toml").exists() {
        println!("skinquiz.toml already exists, skipping.");
    } else {
        std::fs::write("skinquiz.toml", SAMPLE_CONFIG)?;
        println!("Created skinquiz.toml");
    }

    // Create example quiz
    std::fs::create_dir_all("quizzes")?;
    let example_path = std::path::Path::new("quizzes/example.toml");
    if example_path.exists() {
        println!("quizzes/example.toml already exists, skipping.");
    } else {
        std::fs::write(example_path, EXAMPLE_QUIZ)?;
        println!("Created quizzes/example.toml");
    }

    println!("\nNext steps:");
    println!("  1. Edit quizzes/example.toml or add your own quizzes");
    println!("  2. Run: skinquiz validate --quiz quizzes");
    println!("  3. Run: skinquiz take --id example --lang en");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# skinquiz configuration

quizzes_dir = "./quizzes"
default_language = "ro"
# output_dir = "./outcomes"
"#;

const EXAMPLE_QUIZ: &str = r#"[quiz]
id = "example"
title = { ro = "Rutina ta de seară", en = "Your evening routine" }
description = { ro = "Două întrebări despre îngrijirea de seară.", en = "Two questions about your evening care." }
languages = ["ro", "en"]
default_language = "ro"

[[questions]]
text = { ro = "Îți demachiezi tenul în fiecare seară?", en = "Do you remove your makeup every evening?" }

[[questions.options]]
text = { ro = "Mereu", en = "Always" }
score = 2

[[questions.options]]
text = { ro = "Uneori", en = "Sometimes" }
score = 1

[[questions.options]]
text = { ro = "Rareori", en = "Rarely" }
score = 0

[[questions]]
text = { ro = "Folosești o cremă de noapte?", en = "Do you use a night cream?" }

[[questions.options]]
text = { ro = "Da", en = "Yes" }
score = 2

[[questions.options]]
text = { ro = "Nu", en = "No" }
score = 0

[[results]]
min_score = 0
max_score = 1
text = { ro = "Rutina ta are nevoie de atenție: începe cu o demachiere blândă.", en = "Your routine needs attention: start with a gentle cleanse." }

[[results]]
min_score = 2
max_score = 3
text = { ro = "Ești pe drumul cel bun: adaugă o cremă de noapte hrănitoare.", en = "You are on the right track: add a nourishing night cream." }

[[results]]
min_score = 4
max_score = 4
text = { ro = "Rutină exemplară: continuă așa!", en = "Exemplary routine: keep it up!" }
"#;
