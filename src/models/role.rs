use diesel::prelude::*;

use crate::models::user::User;

#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::roles)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Role {
    pub id: i32,
    pub name: String,
}

impl Role {
    /// Users carrying this role. Computed on demand, not stored.
    pub fn users(&self, conn: &mut SqliteConnection) -> QueryResult<Vec<User>> {
        use crate::schema::users::dsl::*;
        users
            .filter(role_id.eq(self.id))
            .select(User::as_select())
            .load(conn)
    }
}

#[derive(Insertable, Debug)]
#[diesel(table_name = crate::schema::roles)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct NewRole {
    pub name: String,
}

impl NewRole {
    pub fn insert(&self, conn: &mut SqliteConnection) -> QueryResult<Role> {
        use crate::schema::roles::dsl::*;
        diesel::insert_into(roles)
            .values(self)
            .returning(Role::as_returning())
            .get_result(conn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::test_pool;

    #[test]
    fn role_lists_only_its_own_users() {
        let pool = test_pool();
        let mut conn = pool.get().unwrap();
        let role = NewRole {
            name: "Administrator".to_string(),
        }
        .insert(&mut conn)
        .unwrap();
        let (alice, _) = User::record(&mut conn, "alice").unwrap();
        User::record(&mut conn, "bob").unwrap();
        {
            use crate::schema::users::dsl::*;
            diesel::update(users.filter(id.eq(alice.id)))
                .set(role_id.eq(role.id))
                .execute(&mut conn)
                .unwrap();
        }
        let members = role.users(&mut conn).unwrap();
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].username, "alice");
    }

    #[test]
    fn role_names_are_unique() {
        let pool = test_pool();
        let mut conn = pool.get().unwrap();
        let new_role = NewRole {
            name: "Moderator".to_string(),
        };
        new_role.insert(&mut conn).unwrap();
        assert!(new_role.insert(&mut conn).is_err());
    }
}
