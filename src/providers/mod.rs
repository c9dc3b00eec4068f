pub mod bizflycloud;
