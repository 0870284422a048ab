pub mod job_message;
