use serde::{Deserialize, Serialize};

use super::ApiClient;
use crate::error::ApiResult;
use crate::models::Course;

#[derive(Deserialize)]
struct CoursesEnvelope {
    courses: Vec<Course>,
}

#[derive(Deserialize)]
struct CourseEnvelope {
    course: Course,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CourseIdBody<'a> {
    course_id: &'a str,
}

#[derive(Deserialize)]
struct EnrollResponse {
    #[serde(default)]
    message: Option<String>,
}

#[derive(Deserialize)]
struct UnenrollResponse {
    #[serde(default)]
    message: Option<String>,
    course: Course,
}

impl ApiClient {
    /// GET /api/courses/all — the whole catalog.
    pub async fn get_all_courses(&self) -> ApiResult<Vec<Course>> {
        let req = self.authed(self.get("/api/courses/all"));
        let envelope: CoursesEnvelope =
            self.report("Failed to fetch courses", self.send(req).await)?;
        Ok(envelope.courses)
    }

    /// GET /api/courses/my — the current user's enrollments.
    pub async fn get_my_courses(&self) -> ApiResult<Vec<Course>> {
        let req = self.authed(self.get("/api/courses/my"));
        let envelope: CoursesEnvelope =
            self.report("Failed to fetch your courses", self.send(req).await)?;
        Ok(envelope.courses)
    }

    /// GET /api/courses/{id}/info
    pub async fn get_course_info(&self, course_id: &str) -> ApiResult<Course> {
        let req = self.authed(self.get(&format!("/api/courses/{course_id}/info")));
        let envelope: CourseEnvelope =
            self.report("Failed to fetch course info", self.send(req).await)?;
        Ok(envelope.course)
    }

    /// POST /api/enroll. Returns the backend's confirmation message; the
    /// enrollment set itself is re-fetched afterwards.
    pub async fn join_course(&self, course_id: &str) -> ApiResult<String> {
        let body = CourseIdBody { course_id };
        let req = self.authed(self.post("/api/enroll").json(&body));
        let resp: EnrollResponse = self.report("Failed to join course", self.send(req).await)?;
        Ok(resp.message.unwrap_or_else(|| "Enrolled".to_string()))
    }

    /// POST /api/unenroll. The response carries the updated course.
    pub async fn leave_course(&self, course_id: &str) -> ApiResult<Course> {
        let body = CourseIdBody { course_id };
        let req = self.authed(self.post("/api/unenroll").json(&body));
        let resp: UnenrollResponse =
            self.report("Failed to leave course", self.send(req).await)?;
        if let Some(message) = resp.message {
            tracing::info!("{message}");
        }
        Ok(resp.course)
    }
}
