pub mod track_export;
