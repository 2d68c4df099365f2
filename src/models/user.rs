use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// DB row struct, including the bcrypt hash.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i32,
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub name: String,
    pub surname: String,
    pub third_name: String,
}

/// Public profile returned by `GET /user/{id}`
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct UserData {
    pub id: i32,
    pub email: String,
    pub name: String,
    pub surname: String,
    pub third_name: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub email: String,
    pub password: String,
    /// "Surname Name ThirdName"
    pub full_name: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Name parts as stored in `users`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FullName {
    pub surname: String,
    pub name: String,
    pub third_name: String,
}

impl std::str::FromStr for FullName {
    type Err = anyhow::Error;

    /// Parses "Surname Name ThirdName". Extra trailing words are ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split_whitespace();
        match (parts.next(), parts.next(), parts.next()) {
            (Some(surname), Some(name), Some(third_name)) => Ok(FullName {
                surname: surname.to_string(),
                name: name.to_string(),
                third_name: third_name.to_string(),
            }),
            _ => Err(anyhow::anyhow!(
                "full_name must contain surname, name and third name"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_name_parses_three_parts() {
        let name: FullName = "Petrov Petr Ivanovich".parse().unwrap();
        assert_eq!(name.surname, "Petrov");
        assert_eq!(name.name, "Petr");
        assert_eq!(name.third_name, "Ivanovich");
    }

    #[test]
    fn test_full_name_requires_three_parts() {
        assert!("Petrov Petr".parse::<FullName>().is_err());
        assert!("".parse::<FullName>().is_err());
    }

    #[test]
    fn test_full_name_tolerates_extra_spaces() {
        let name: FullName = "  Petrov   Petr Ivanovich ".parse().unwrap();
        assert_eq!(name.name, "Petr");
    }

    #[test]
    fn test_password_hash_not_serialized() {
        let user = User {
            id: 1,
            email: "petrov@mail.ru".into(),
            password: "$2b$12$hash".into(),
            name: "Petr".into(),
            surname: "Petrov".into(),
            third_name: "Ivanovich".into(),
        };
        let value = serde_json::to_value(&user).unwrap();
        assert!(value.get("password").is_none());
        assert_eq!(value["email"], "petrov@mail.ru");
    }
}
