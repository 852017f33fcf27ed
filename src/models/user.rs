use diesel::prelude::*;

#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::users)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct User {
    pub id: i32,
    pub username: String,
    pub role_id: Option<i32>,
}

impl User {
    /// Records a username, inserting it if it has not been seen before.
    ///
    /// The insert races only against the unique constraint on `username`:
    /// `INSERT OR IGNORE` either creates the row or is a no-op, and the
    /// affected-row count tells us which. Returns the stored user and
    /// whether it was newly inserted.
    pub fn record(conn: &mut SqliteConnection, name: &str) -> QueryResult<(User, bool)> {
        use crate::schema::users::dsl::*;
        let inserted = diesel::insert_or_ignore_into(users)
            .values(NewUser {
                username: name,
                role_id: None,
            })
            .execute(conn)?;
        let user = users
            .filter(username.eq(name))
            .select(User::as_select())
            .first(conn)?;
        Ok((user, inserted > 0))
    }

    pub fn count(conn: &mut SqliteConnection) -> QueryResult<i64> {
        use crate::schema::users::dsl::*;
        users.count().get_result(conn)
    }
}

#[derive(Insertable, Debug)]
#[diesel(table_name = crate::schema::users)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct NewUser<'a> {
    pub username: &'a str,
    pub role_id: Option<i32>,
}
