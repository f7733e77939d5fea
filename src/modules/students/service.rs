use anyhow::Context;
use sqlx::{PgConnection, PgExecutor, PgPool, QueryBuilder};
use tracing::instrument;
use uuid::Uuid;

use schoolhub_core::AppError;
use schoolhub_db::{FilterSet, Sequence};

use super::model::{
    CreateStudentDto, DEFAULT_NATIONALITY, Student, StudentFilterParams, StudentListResponse,
    UpdateStudentDto,
};

const DUPLICATE_STUDENT_ID: &str = "Student ID already exists";

pub struct StudentService;

impl StudentService {
    fn filters(params: &StudentFilterParams) -> FilterSet {
        FilterSet::new()
            .search(
                &["student_id", "student_name_lao", "guardian_phone", "phone_number"],
                params.search.clone(),
            )
            .eq("gender", params.gender.clone().map(|g| g.to_uppercase()))
    }

    #[instrument(skip(db))]
    pub async fn get_students(
        db: &PgPool,
        params: StudentFilterParams,
    ) -> Result<StudentListResponse, AppError> {
        let filters = Self::filters(&params);

        let mut count = QueryBuilder::new("SELECT COUNT(*) FROM students");
        filters.push_where(&mut count);
        let total: i64 = count
            .build_query_scalar::<i64>()
            .fetch_one(db)
            .await
            .context("Failed to count students")
            .map_err(AppError::database)?;

        let mut query = QueryBuilder::new("SELECT * FROM students");
        filters.push_where(&mut query);
        query
            .push(" ORDER BY student_id LIMIT ")
            .push_bind(params.pagination.limit())
            .push(" OFFSET ")
            .push_bind(params.pagination.offset());

        let students = query
            .build_query_as::<Student>()
            .fetch_all(db)
            .await
            .context("Failed to fetch students")
            .map_err(AppError::database)?;

        Ok(StudentListResponse { students, total })
    }

    #[instrument(skip(db))]
    pub async fn get_student(db: &PgPool, id: Uuid) -> Result<Student, AppError> {
        sqlx::query_as::<_, Student>("SELECT * FROM students WHERE id = $1")
            .bind(id)
            .fetch_optional(db)
            .await
            .context("Failed to fetch student by ID")
            .map_err(AppError::database)?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Student not found")))
    }

    #[instrument(skip(db))]
    pub async fn get_by_student_id(db: &PgPool, student_id: &str) -> Result<Student, AppError> {
        Self::find_by_student_id(db, student_id)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Student not found")))
    }

    pub(crate) async fn find_by_student_id<'e, E>(
        executor: E,
        student_id: &str,
    ) -> Result<Option<Student>, AppError>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Student>("SELECT * FROM students WHERE student_id = $1")
            .bind(student_id.trim())
            .fetch_optional(executor)
            .await
            .context("Failed to fetch student by student ID")
            .map_err(AppError::database)
    }

    #[instrument(skip(db, dto), fields(student_id = ?dto.student_id))]
    pub async fn create_student(db: &PgPool, dto: CreateStudentDto) -> Result<Student, AppError> {
        let mut tx = db.begin().await.map_err(AppError::database)?;
        let student = Self::insert_student(&mut *tx, dto).await?;
        tx.commit().await.map_err(AppError::database)?;

        crate::metrics::track_student_created();
        Ok(student)
    }

    /// Inserts a student on an open connection, allocating `student_id` when
    /// the form leaves it out. Used on its own and by enrollment.
    pub(crate) async fn insert_student(
        conn: &mut PgConnection,
        dto: CreateStudentDto,
    ) -> Result<Student, AppError> {
        let student_id = match dto.student_id.as_deref().map(str::trim) {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => Sequence::STUDENTS
                .next_id(&mut *conn)
                .await
                .context("Failed to allocate student ID")
                .map_err(AppError::database)?,
        };

        sqlx::query_as::<_, Student>(
            r#"
            INSERT INTO students (
                student_id, student_name_lao, guardian_phone, gender, province, district,
                village, id_number, id_issued_date, birth_village, birth_district,
                birth_province, ethnicity, religion, nationality, date_of_birth,
                phone_number, photo_url
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18)
            RETURNING *
            "#,
        )
        .bind(&student_id)
        .bind(dto.student_name_lao.trim())
        .bind(&dto.guardian_phone)
        .bind(dto.gender.as_str())
        .bind(&dto.province)
        .bind(&dto.district)
        .bind(&dto.village)
        .bind(&dto.id_number)
        .bind(dto.id_issued_date)
        .bind(&dto.birth_village)
        .bind(&dto.birth_district)
        .bind(&dto.birth_province)
        .bind(&dto.ethnicity)
        .bind(&dto.religion)
        .bind(dto.nationality.as_deref().unwrap_or(DEFAULT_NATIONALITY))
        .bind(dto.date_of_birth)
        .bind(&dto.phone_number)
        .bind(&dto.photo_url)
        .fetch_one(conn)
        .await
        .map_err(|e| AppError::from_db(e, DUPLICATE_STUDENT_ID))
    }

    #[instrument(skip(db, dto))]
    pub async fn update_student(
        db: &PgPool,
        id: Uuid,
        dto: UpdateStudentDto,
    ) -> Result<Student, AppError> {
        let existing = Self::get_student(db, id).await?;

        let UpdateStudentDto {
            student_id,
            student_name_lao,
            gender,
            guardian_phone,
            province,
            district,
            village,
            id_number,
            id_issued_date,
            birth_village,
            birth_district,
            birth_province,
            ethnicity,
            religion,
            nationality,
            date_of_birth,
            phone_number,
            photo_url,
        } = dto;

        let nothing_to_update = student_id.is_none()
            && student_name_lao.is_none()
            && gender.is_none()
            && guardian_phone.is_none()
            && province.is_none()
            && district.is_none()
            && village.is_none()
            && id_number.is_none()
            && id_issued_date.is_none()
            && birth_village.is_none()
            && birth_district.is_none()
            && birth_province.is_none()
            && ethnicity.is_none()
            && religion.is_none()
            && nationality.is_none()
            && date_of_birth.is_none()
            && phone_number.is_none()
            && photo_url.is_none();
        if nothing_to_update {
            return Err(AppError::bad_request(anyhow::anyhow!("No fields to update")));
        }

        sqlx::query_as::<_, Student>(
            r#"
            UPDATE students SET
                student_id = $1, student_name_lao = $2, guardian_phone = $3, gender = $4,
                province = $5, district = $6, village = $7, id_number = $8,
                id_issued_date = $9, birth_village = $10, birth_district = $11,
                birth_province = $12, ethnicity = $13, religion = $14, nationality = $15,
                date_of_birth = $16, phone_number = $17, photo_url = $18, updated_at = NOW()
            WHERE id = $19
            RETURNING *
            "#,
        )
        .bind(student_id.map(|s| s.trim().to_string()).unwrap_or(existing.student_id))
        .bind(student_name_lao.map(|s| s.trim().to_string()).unwrap_or(existing.student_name_lao))
        .bind(guardian_phone.or(existing.guardian_phone))
        .bind(gender.map(|g| g.as_str().to_string()).unwrap_or(existing.gender))
        .bind(province.or(existing.province))
        .bind(district.or(existing.district))
        .bind(village.or(existing.village))
        .bind(id_number.or(existing.id_number))
        .bind(id_issued_date.or(existing.id_issued_date))
        .bind(birth_village.or(existing.birth_village))
        .bind(birth_district.or(existing.birth_district))
        .bind(birth_province.or(existing.birth_province))
        .bind(ethnicity.or(existing.ethnicity))
        .bind(religion.or(existing.religion))
        .bind(nationality.or(existing.nationality))
        .bind(date_of_birth.or(existing.date_of_birth))
        .bind(phone_number.or(existing.phone_number))
        .bind(photo_url.or(existing.photo_url))
        .bind(id)
        .fetch_optional(db)
        .await
        .map_err(|e| AppError::from_db(e, DUPLICATE_STUDENT_ID))?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Student not found")))
    }

    #[instrument(skip(db))]
    pub async fn delete_student(db: &PgPool, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM students WHERE id = $1")
            .bind(id)
            .execute(db)
            .await
            .map_err(|e| AppError::from_db(e, "Student has registrations and cannot be deleted"))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!("Student not found")));
        }

        Ok(())
    }
}
