//! Intake form - collects name, age and education before the first game

use cogni_domain::model::user::parse_age;
use cogni_domain::{Education, UserData};
use dialoguer::{Input, Select};

/// Ask for the intake fields until they validate
pub fn prompt_user() -> anyhow::Result<UserData> {
    let name: String = Input::new()
        .with_prompt("Your name")
        .validate_with(|input: &String| check_name(input))
        .interact_text()?;

    let age: String = Input::new()
        .with_prompt("Your age")
        .validate_with(|input: &String| check_age(input))
        .interact_text()?;

    let levels = education_labels();
    let choice = Select::new()
        .with_prompt("Highest education")
        .items(&levels)
        .default(0)
        .interact()?;

    let education = Education::all()
        .get(choice)
        .copied()
        .ok_or_else(|| anyhow::anyhow!("No education level at position {}", choice))?;
    let user = UserData::new(name, parse_age(&age)?, education)?;
    Ok(user)
}

fn check_name(input: &str) -> Result<(), String> {
    if input.trim().is_empty() {
        Err("Please enter a name".to_string())
    } else {
        Ok(())
    }
}

fn check_age(input: &str) -> Result<(), String> {
    parse_age(input).map(|_| ()).map_err(|e| e.to_string())
}

fn education_labels() -> Vec<&'static str> {
    Education::all().iter().map(|e| e.display_name()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_name() {
        assert!(check_name("Alex").is_ok());
        assert!(check_name("   ").is_err());
    }

    #[test]
    fn test_check_age() {
        assert!(check_age("24").is_ok());
        assert!(check_age(" 7 ").is_ok());
        assert!(check_age("0").is_err());
        assert!(check_age("-3").is_err());
        assert!(check_age("old").is_err());
    }

    #[test]
    fn test_every_education_level_listed() {
        assert_eq!(education_labels().len(), Education::all().len());
    }
}
