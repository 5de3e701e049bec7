use crate::model::{Group, User, Userlist};

use super::lexer::tokenize_line;

pub(crate) fn extract_userlist(name: &str, lines: &[&str]) -> Userlist {
    let mut userlist = Userlist::builder().name(name).build();
    for raw in lines {
        let tokens = tokenize_line(raw);
        let Some((head, rest)) = tokens.split_first() else {
            continue;
        };
        match *head {
            "user" if !rest.is_empty() => {
                let username = rest[0];
                let mut password_hash = String::new();
                let mut groups = Vec::new();
                let mut i = 1;
                while i < rest.len() {
                    match rest[i] {
                        "password" if i + 1 < rest.len() => {
                            password_hash = rest[i + 1].to_string();
                            i += 2;
                        }
                        "groups" if i + 1 < rest.len() => {
                            groups = rest[i + 1].split(',').map(|g| g.to_string()).collect();
                            i += 2;
                        }
                        _ => i += 1,
                    }
                }
                userlist.users.insert(
                    username.to_string(),
                    User::builder()
                        .username(username)
                        .password_hash(password_hash)
                        .groups(groups)
                        .build(),
                );
            }
            "group" if !rest.is_empty() => {
                let group_name = rest[0];
                let users: Vec<String> = rest
                    .iter()
                    .position(|t| *t == "users")
                    .and_then(|idx| rest.get(idx + 1))
                    .map(|csv| csv.split(',').map(|u| u.to_string()).collect())
                    .unwrap_or_default();
                userlist.groups.insert(
                    group_name.to_string(),
                    Group::builder().name(group_name).users(users).build(),
                );
            }
            _ => {}
        }
    }
    userlist
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn extracts_users_and_groups() {
        let lines = vec![
            "group admins users alice,bob",
            "user alice password hash1 groups admins",
            "user bob password hash2",
        ];
        let userlist = extract_userlist("auth_users", &lines);
        assert_eq!(userlist.users.len(), 2);
        assert_eq!(userlist.users["alice"].groups, vec!["admins".to_string()]);
        assert_eq!(userlist.groups["admins"].users, vec!["alice".to_string(), "bob".to_string()]);
    }
}
